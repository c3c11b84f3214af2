pub mod cycles;
pub mod dto;
pub mod error;
pub mod report;
pub mod resources;
pub mod search;
pub mod shop;
pub mod simulate;

pub use error::Error;

/// dimensional analysis types
pub type Minutes = i32;
pub type Load = f32;
pub type Qty = u32;

/// arena index into the per-run job vector
pub type JobIdx = usize;

/// shop floor parameters
pub const N_CELLS: usize = 6;
pub const STANDARD_SHIFT: Minutes = 440;
pub const OVERTIME_SHIFT: Minutes = 500;

/// end-of-shift admission parameters
pub const POUR_CUTOFF: Minutes = 40;
pub const SUMMER_CURE_FACTOR: f32 = 1.5;

/// fixture concurrency defaults by pattern letter
pub const FIXTURE_CAP_D: usize = 4;
pub const FIXTURE_CAP_V: usize = 2;
pub const FIXTURE_CAP_S: usize = 3;

/// mold pool capacity defaults
pub const COLOR_MOLD_CAP: usize = 12;
pub const COMMON_MOLD_CAP: usize = 4;
pub const DEEP_MOLD_CAP: usize = 8;

/// class-A surplus at which a second dedicated cell is carved out
pub const SURPLUS_TWO_CELLS: Qty = 16;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging to terminal and logs/ directory
pub fn init() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
