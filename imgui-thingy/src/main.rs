use std::process::ExitCode;

use imgui_thingy::{
    config::Config,
    event_loop::{EXIT_INIT_FAILED, EventLoop, LoopState},
    logger,
    sdl::SdlPlatform,
};

fn main() -> ExitCode {
    logger::init();
    let cfg = Config::from_env();
    log::info!("Starting {}", cfg.title);

    let platform = match SdlPlatform::init(&cfg) {
        Ok(platform) => platform,
        Err(e) => {
            log::debug!("{e:#}");
            return ExitCode::from(EXIT_INIT_FAILED);
        }
    };

    let mut main_loop = EventLoop::new(platform);
    let status = main_loop.run();
    debug_assert_eq!(main_loop.state(), LoopState::Terminated);
    log::info!("Window closed after {} frames", main_loop.frames());
    // Tears down the GUI, the GL context and the window before exiting.
    drop(main_loop);
    ExitCode::from(status)
}
