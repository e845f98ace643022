//! shipsort binary entry point

fn main() -> anyhow::Result<()> {
    shipsort::cli::run()
}
