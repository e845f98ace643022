//! core::aliases
//!
//! Embedded display-name alias data.
//!
//! Two shapes of data, both folded into one lookup by [`crate::core::naming`]:
//!
//! - [`GROUPS`]: canonical key plus the alternate labels that mean it. The
//!   canonical key is registered as an alias of itself.
//! - [`PAIRS`]: `(alternate, canonical display name)` pairs.
//!
//! Both sides are normalized before insertion. When two entries claim the
//! same alternate, the first one listed wins, so vanilla names come before
//! modded ones.

/// Canonical keys with their alternate labels.
pub const GROUPS: &[(&str, &[&str])] = &[
    // Store items and common config targets
    ("boombox", &["붐박스"]),
    ("flashlight", &["손전등"]),
    ("jetpack", &["제트팩"]),
    ("key", &["열쇠"]),
    ("lockpicker", &["자물쇠 따개"]),
    ("apparatus", &["장치", "apparatice"]),
    ("pro_flashlight", &["프로 손전등", "pro-flashlight"]),
    ("shovel", &["철제 삽"]),
    ("stun_grenade", &["기절 수류탄", "stun grenade"]),
    ("extension_ladder", &["연장형 사다리", "extension ladder"]),
    ("tzp_inhalant", &["tzp-흡입제", "tzp-inhalant"]),
    ("walkie_talkie", &["무전기", "walkie-talkie"]),
    ("zap_gun", &["잽건", "zap gun"]),
    ("radar_booster", &["레이더 부스터", "radar booster", "radar-booster"]),
    ("spray_paint", &["페인트 스프레이", "스프레이 페인트", "spray paint"]),
    ("shotgun", &["산탄총"]),
    ("ammo", &["탄약"]),
    ("clipboard", &["클립보드"]),
    ("sticky_note", &["스티커 메모", "스티커메모", "sticky note"]),
    // Short English labels used by translation patches
    ("coffee_mug", &["mug", "머그잔", "coffee mug", "커피 머그잔"]),
    ("hair_brush", &["brush", "hair brush", "빗"]),
    ("brass_bell", &["bell", "brass bell", "황동 종", "종"]),
    ("bee_hive", &["hive", "bee hive", "벌집"]),
    ("wedding_ring", &["ring", "wedding ring", "반지"]),
    ("robot_toy", &["toy robot", "robot toy", "장난감 로봇", "로봇 장난감"]),
    ("rubber_ducky", &["rubber ducky", "고무 오리"]),
    (
        "tattered_metal_sheet",
        &["metal sheet", "tattered metal sheet", "금속 판", "너덜너덜한 금속 판"],
    ),
    ("homemade_flashbang", &["homemade flashbang", "사제 섬광탄"]),
    // Modded content
    ("bubblegun", &["비눗방울 총"]),
    ("broken_p88", &["망가진 p88", "broken p88"]),
    ("employee", &["직원"]),
    ("mine", &["지뢰"]),
    ("toothles", &["투슬리스", "toothles"]),
    ("crossbow", &["석궁", "crossbow"]),
    ("physgun", &["피직스건", "physgun"]),
    ("ammo_crate", &["탄약 상자", "ammo crate"]),
    ("drink", &["음료수"]),
    ("radio", &["라디오"]),
    ("mouse", &["마우스"]),
    ("monitor", &["모니터"]),
    ("battery", &["건전지"]),
    ("cannon", &["대포"]),
    ("health_drink", &["건강 음료", "health drink"]),
    ("chemical", &["화학 약품"]),
    ("disinfecting_alcohol", &["소독용 알코올", "disinfecting alcohol"]),
    ("ampoule", &["앰풀"]),
    ("blood_pack", &["혈액 팩", "blood pack"]),
    ("flip_lighter", &["라이터", "flip lighter"]),
    ("rubber_ball", &["고무 공", "rubber ball"]),
    ("video_tape", &["비디오 테이프", "video tape"]),
    ("first_aid_kit", &["구급 상자", "first aid kit"]),
    ("gold_medallion", &["금메달", "gold medallion"]),
    ("steel_pipe", &["금속 파이프", "steel pipe"]),
    ("axe", &["도끼"]),
    ("emergency_hammer", &["비상용 망치", "emergency hammer"]),
    ("katana", &["카타나"]),
    ("silver_medallion", &["은메달", "silver medallion"]),
    ("pocket_radio", &["휴대용 라디오", "pocket radio"]),
    ("teddy_plush", &["곰 인형", "teddy plush"]),
];

/// `(alternate, canonical display name)` pairs.
pub const PAIRS: &[(&str, &str)] = &[
    // Vanilla scrap
    ("마법의 7번 공", "Magic 7 ball"),
    ("에어혼", "Airhorn"),
    ("황동 종", "Brass bell"),
    ("큰 나사", "Big bolt"),
    ("병 묶음", "Bottles"),
    ("빗", "Hair brush"),
    ("사탕", "Candy"),
    ("금전 등록기", "Cash register"),
    ("화학 용기", "Chemical jug"),
    ("광대 나팔", "Clown horn"),
    ("대형 축", "Large axle"),
    ("틀니", "Teeth"),
    ("쓰레받기", "Dust pan"),
    ("달걀 거품기", "Egg beater"),
    ("v형 엔진", "V-type engine"),
    ("황금 컵", "Golden cup"),
    ("멋진 램프", "Fancy lamp"),
    ("그림", "Painting"),
    ("플라스틱 물고기", "Plastic fish"),
    ("레이저 포인터", "Laser pointer"),
    ("금 주괴", "Gold Bar"),
    ("헤어 드라이기", "Hairdryer"),
    ("돋보기", "Magnifying glass"),
    ("너덜너덜한 금속 판", "Tattered metal sheet"),
    ("쿠키 틀", "Cookie mold pan"),
    ("머그잔", "Coffee mug"),
    ("커피 머그잔", "Coffee mug"),
    ("향수 병", "Perfume bottle"),
    ("구식 전화기", "Old phone"),
    ("피클 병", "Jar of pickles"),
    ("약 병", "Pill bottle"),
    ("리모컨", "Remote"),
    ("결혼 반지", "Wedding ring"),
    ("로봇 장난감", "Robot Toy"),
    ("고무 오리", "Rubber ducky"),
    ("빨간색 소다", "Red soda"),
    ("운전대", "Steering wheel"),
    ("정지 표지판", "Stop sign"),
    ("찻주전자", "Tea Kettle"),
    ("치약", "Toothpaste"),
    ("장난감 큐브", "Toy cube"),
    ("벌집", "Bee hive"),
    ("양보 표지판", "Yield sign"),
    ("산탄총", "Shotgun"),
    ("더블 배럴", "Double-barrel"),
    ("산탄총 탄약", "Shotgun shell"),
    ("사제 섬광탄", "Homemade Flashbang"),
    ("선물", "Gift"),
    ("선물 상자", "Gift box"),
    ("플라스크", "Flask"),
    ("비극", "Tragedy"),
    ("희극", "Comedy"),
    ("방귀 쿠션", "Whoopie cushion"),
    // misspelling seen in older translation packs
    ("방퀴 쿠션", "Whoopie cushion"),
    ("식칼", "Kitchen knife"),
    ("부활절 달걀", "Easter egg"),
    ("제초제", "Weed killer"),
    ("벨트 배낭", "Belt bag"),
    ("축구공", "Soccer ball"),
    ("조작 패드", "Control pad"),
    ("쓰레기통 뚜껑", "Garbage lid"),
    ("플라스틱 컵", "Plastic cup"),
    ("화장실 휴지", "Toilet paper"),
    ("장난감 기차", "Toy train"),
    ("제드 도그", "Zed Dog"),
    ("시계", "Clock"),
    ("시체", "Body"),
    ("알", "Egg"),
    // Vanilla props
    ("열쇠", "Key"),
    ("데이터 칩", "Data chip"),
    ("교육용 지침서", "Training manual"),
    ("장치", "Apparatus"),
    // ImmersiveScraps
    ("알코올 플라스크", "Alcohol Flask"),
    ("모루", "Anvil"),
    ("야구 방망이", "Baseball bat"),
    ("맥주 캔", "Beer can"),
    ("벽돌", "Brick"),
    ("망가진 엔진", "Broken engine"),
    ("양동이", "Bucket"),
    ("페인트 캔", "Can paint"),
    ("수통", "Canteen"),
    ("자동차 배터리", "Car battery"),
    ("조임틀", "Clamp"),
    ("멋진 그림", "Fancy Painting"),
    ("선풍기", "Fan"),
    ("소방 도끼", "Fireaxe"),
    ("소화기", "Fire extinguisher"),
    ("소화전", "Fire hydrant"),
    ("통조림", "Food can"),
    ("게임보이", "Gameboy"),
    ("쓰레기", "Garbage"),
    ("망치", "Hammer"),
    ("기름통", "Jerrycan"),
    ("키보드", "Keyboard"),
    ("랜턴", "Lantern"),
    ("도서관 램프", "Library lamp"),
    ("식물", "Plant"),
    ("플라이어", "Pliers"),
    ("뚫어뻥", "Plunger"),
    ("레트로 장난감", "Retro Toy"),
    ("스크류 드라이버", "Screwdriver"),
    ("싱크대", "Sink"),
    ("소켓 렌치", "Socket Wrench"),
    ("여행 가방", "Suitcase"),
    ("토스터기", "Toaster"),
    ("공구 상자", "Toolbox"),
    ("실크햇", "Top hat"),
    ("라바콘", "Traffic cone"),
    ("환풍구", "Vent"),
    ("물뿌리개", "Watering Can"),
    ("바퀴", "Wheel"),
    ("와인 병", "Wine bottle"),
    ("렌치", "Wrench"),
    // Wesleys
    ("자수정 군집", "Amethyst Cluster"),
    ("주사기", "Syringe"),
    ("주사기총", "Syringe Gun"),
    ("코너 파이프", "Corner Pipe"),
    ("작은 파이프", "Small Pipe"),
    ("파이프", "Flow Pipe"),
    ("뇌가 담긴 병", "Brain Jar"),
    ("호두까기 인형 장난감", "Toy Nutcracker"),
    ("시험관", "Test Tube"),
    ("시험관 랙", "Test Tube Rack"),
    ("호두까기 인형 눈", "Nutcracker Eye"),
    ("파란색 시험관", "Blue Test Tube"),
    ("노란색 시험관", "Yellow Test Tube"),
    ("빨간색 시험관", "Red Test Tube"),
    ("초록색 시험관", "Green Test Tube"),
    ("쇠지렛대", "Crowbar"),
    ("플젠", "Plzen"),
    ("컵", "Cup"),
    ("전자레인지", "Microwave"),
    ("hyper acid 실험 기록", "Experiment Log Hyper Acid"),
    ("희극 가면 실험 기록", "Experiment Log Comedy Mask"),
    ("저주받은 동전 실험 기록", "Experiment Log Cursed Coin"),
    ("바이오 hxnv7 실험 기록", "Experiment Log BIO HXNV7"),
    ("파란색 폴더", "Blue Folder"),
    ("빨간색 폴더", "Red Folder"),
    ("코일", "Coil"),
    ("타자기", "Typewriter"),
    ("서류 더미", "Documents"),
    ("스테이플러", "Stapler"),
    ("구식 컴퓨터", "Old Computer"),
    ("브론즈 트로피", "Bronze Trophy"),
    ("바나나", "Banana"),
    ("스턴봉", "Stun Baton"),
    ("바이오-hxnv7", "BIO-HXNV7"),
    ("복구된 비밀 일지", "Recovered Secret Log"),
    ("황금 단검 실험 기록", "Experiment Log Golden Dagger"),
    ("대합", "Clam"),
    ("거북이 등딱지", "Turtle Shell"),
    ("생선 뼈", "Fish Bones"),
    ("뿔 달린 껍질", "Horned Shell"),
    ("도자기 찻잔", "Porcelain Teacup"),
    ("대리석", "Marble"),
    ("도자기 병", "Porcelain Bottle"),
    ("도자기 향수 병", "Porcelain Perfume Bottle"),
    ("발광구", "Glowing Orb"),
    ("황금 해골", "Golden Skull"),
    ("코스모코스 지도", "Map of Cosmocos"),
    ("젖은 노트 1", "Wet Note 1"),
    ("젖은 노트 2", "Wet Note 2"),
    ("젖은 노트 3", "Wet Note 3"),
    ("젖은 노트 4", "Wet Note 4"),
    ("우주빛 파편", "Cosmic Shard"),
    ("우주 생장물", "Cosmic Growth"),
    ("천상의 두뇌 덩어리", "Chunk of Celestial Brain"),
    ("파편이 든 양동이", "Bucket of Shards"),
    ("우주빛 손전등", "Cosmic Flashlight"),
    ("잊혀진 일지 1", "Forgotten Log 1"),
    ("잊혀진 일지 2", "Forgotten Log 2"),
    ("잊혀진 일지 3", "Forgotten Log 3"),
    ("안경", "Glasses"),
    ("생장한 배양 접시", "Grown Petri Dish"),
    ("배양 접시", "Petri Dish"),
    ("코스모채드", "Cosmochad"),
    ("죽어가는 우주빛 손전등", "Dying Cosmic Flashlight"),
    ("죽어가는 우주 생장물", "Dying Cosmic Growth"),
    ("혈액 배양 접시", "Blood Petri Dish"),
    ("악마 코스모채드", "Evil Cosmochad"),
    ("악마 코스모", "Evil Cosmo"),
    ("릴 코스모", "Lil Cosmo"),
    ("죽어가는 생장물 배양 접시", "Dying Grown Petri Dish"),
    ("감시하는 배양 접시", "Watching Petri Dish"),
    ("현미경", "Microscope"),
    ("원통형 바일", "Round Vile"),
    ("사각형 바일", "Square Vile"),
    ("타원형 바일", "Oval Vile"),
    ("해링턴 일지 1", "Harrington Log 1"),
    ("해링턴 일지 2", "Harrington Log 2"),
    ("해링턴 일지 3", "Harrington Log 3"),
    ("해링턴 일지 4", "Harrington Log 4"),
    ("생장물이 든 병", "Jar of Growth"),
    ("테이프 플레이어 일지 1", "Tape Player Log 1"),
    ("테이프 플레이어 일지 2", "Tape Player Log 2"),
    ("테이프 플레이어 일지 3", "Tape Player Log 3"),
    ("테이프 플레이어 일지 4", "Tape Player Log 4"),
    ("쇼핑 카트", "Shopping Cart"),
];
