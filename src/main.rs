//! voiceactions main entry point
//!
//! The main loop watches three sources:
//! 1. stdin (key presses) - routed to the board or the voice dialog
//! 2. the engine init channel - delivers the one-shot init result
//! 3. signals - SIGWINCH redraws, SIGTERM/SIGHUP suspend the dialog and exit

use log::{debug, error, info};
use mio::{Events, Interest, Poll, Token};
use nix::libc;
use nix::sys::signal::{self, SigHandler, Signal};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;
use voiceactions::dialog::SessionSnapshot;
use voiceactions::input::{create_default_keymap, dispatch, split_keys, BoardHandler, HandlerAction};
use voiceactions::prefs::{IniStore, VoicePreference, DEFAULT_NAMESPACE};
use voiceactions::speech::backends::{MemoryEngine, NativeEngine};
use voiceactions::speech::{SpeechController, SpeechEngine};
use voiceactions::state::config::Config;
use voiceactions::state::State;
use voiceactions::terminal::{get_terminal_size, read_pending, render, stdin_is_tty, RawModeGuard};
use voiceactions::{Result, VoiceActionsError};

/// Token for stdin in mio poll
const STDIN: Token = Token(0);

/// Poll timeout; also how often the init channel is checked
const TICK: Duration = Duration::from_millis(100);

/// Set by SIGWINCH
static RESIZE_PENDING: AtomicBool = AtomicBool::new(false);

/// Set by SIGTERM and SIGHUP
static TERMINATE_PENDING: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigwinch(_: libc::c_int) {
    RESIZE_PENDING.store(true, Ordering::Relaxed);
}

extern "C" fn handle_terminate(_: libc::c_int) {
    TERMINATE_PENDING.store(true, Ordering::Relaxed);
}

/// Command line options
struct Options {
    /// Log at debug level to voiceactions.log
    debug: bool,
    /// Record speech instead of using the platform engine
    silent: bool,
    /// Alternate configuration file
    config: Option<PathBuf>,
}

fn parse_args() -> Options {
    let mut options = Options {
        debug: false,
        silent: false,
        config: None,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--debug" | "-d" => options.debug = true,
            "--silent" => options.silent = true,
            "--config" | "-c" => options.config = args.next().map(PathBuf::from),
            "--version" | "-V" => {
                println!("{} {}", voiceactions::APP_NAME, voiceactions::VERSION);
                process::exit(0);
            }
            other => {
                eprintln!("Warning: ignoring unknown argument '{}'", other);
            }
        }
    }

    options
}

fn init_logging(debug_mode: bool) {
    if debug_mode {
        // The terminal is in raw mode, so debug output goes to a file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("voiceactions.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open voiceactions.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "voiceactions version {} starting (debug mode, logging to voiceactions.log)",
            voiceactions::VERSION
        );
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Error)
            .init();
    }
}

fn main() {
    let options = parse_args();
    init_logging(options.debug);

    if let Err(e) = run(options) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    debug!("Initializing voiceactions");

    if !stdin_is_tty() {
        eprintln!("Error: voiceactions requires an interactive terminal (stdin is not a TTY)");
        process::exit(1);
    }

    let config = match options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let data_dir = Config::data_dir();
    let preference = VoicePreference::new(Box::new(IniStore::open(
        data_dir.join("preferences.ini"),
        DEFAULT_NAMESPACE,
    )));

    let engine: Box<dyn SpeechEngine> = if options.silent {
        info!("Silent mode, speech is only logged");
        Box::new(MemoryEngine::new(Vec::new()))
    } else {
        Box::new(NativeEngine::new())
    };
    let speech = SpeechController::new(engine, config.speech_settings());

    let snapshot_path = data_dir.join("dialog.json");
    let mut state = State::new(config, speech, preference).with_snapshot_path(&snapshot_path);
    if let Some(snapshot) = SessionSnapshot::take_from(&snapshot_path) {
        info!("Resuming suspended voice dialog");
        state.resume_dialog(snapshot);
    }

    // The init result is delivered back on this thread by the loop below
    let (init_tx, init_rx) = mpsc::channel();
    state.start(Box::new(move |status| {
        let _ = init_tx.send(status);
    }));

    let _raw_mode = RawModeGuard::enable()?;

    unsafe {
        signal::signal(Signal::SIGWINCH, SigHandler::Handler(handle_sigwinch))
            .and_then(|_| signal::signal(Signal::SIGTERM, SigHandler::Handler(handle_terminate)))
            .and_then(|_| signal::signal(Signal::SIGHUP, SigHandler::Handler(handle_terminate)))
            .map_err(|e| {
                VoiceActionsError::Terminal(format!("Failed to set signal handlers: {}", e))
            })?;
    }

    let stdin_fd = io::stdin().as_raw_fd();
    let mut poll = Poll::new()?;
    poll.registry().register(
        &mut mio::unix::SourceFd(&stdin_fd),
        STDIN,
        Interest::READABLE,
    )?;
    let mut events = Events::with_capacity(16);

    let mut board = BoardHandler::new(create_default_keymap());
    draw(&state, stdin_fd)?;

    info!("voiceactions ready - entering event loop");

    loop {
        if TERMINATE_PENDING.swap(false, Ordering::Relaxed) {
            info!("Terminated by signal");
            state.suspend();
            break;
        }

        let mut redraw = RESIZE_PENDING.swap(false, Ordering::Relaxed);

        if let Ok(status) = init_rx.try_recv() {
            info!("Engine init result: {:?}", status);
            state.on_engine_init(status);
            redraw = true;
        }

        match poll.poll(&mut events, Some(TICK)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                debug!("poll() interrupted by signal");
            }
            Err(e) => return Err(e.into()),
        }

        let mut exit = false;
        for event in events.iter() {
            if event.token() == STDIN {
                match handle_stdin(&mut state, &mut board) {
                    Ok(HandlerAction::Exit) => exit = true,
                    Ok(_) => redraw = true,
                    Err(e) => {
                        error!("stdin error: {}", e);
                        exit = true;
                    }
                }
            }
        }

        if exit {
            state.suspend();
            break;
        }
        if redraw {
            draw(&state, stdin_fd)?;
        }
    }

    state.shutdown();
    io::stdout().write_all(b"\r\n")?;
    io::stdout().flush()?;
    Ok(())
}

/// Read pending key presses and dispatch them
fn handle_stdin(state: &mut State, board: &mut BoardHandler) -> Result<HandlerAction> {
    let (input, closed) = read_pending(&mut io::stdin().lock())?;

    let mut last = HandlerAction::Handled;
    for key in split_keys(&input) {
        last = dispatch(key, state, board)?;
        if last == HandlerAction::Exit {
            return Ok(last);
        }
    }

    if closed {
        info!("stdin closed");
        return Ok(HandlerAction::Exit);
    }
    Ok(last)
}

/// Redraw the whole screen
fn draw(state: &State, fd: std::os::unix::io::RawFd) -> Result<()> {
    let (cols, _rows) = get_terminal_size(fd);
    let mut stdout = io::stdout();
    stdout.write_all(render(state, cols).as_bytes())?;
    stdout.flush()?;
    Ok(())
}
