use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::render::HeaderStyle;

/// Diagnostics go to stderr so stdout only carries the tables. Without
/// `RUST_LOG` only warnings are shown, or `info` with `--log-to-stderr`.
pub(crate) fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to init tracing: {err}"))?;
    Ok(())
}

pub(crate) fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub(crate) fn header_style(is_terminal: bool, no_color: bool) -> HeaderStyle {
    if is_terminal && !no_color {
        HeaderStyle::Highlight
    } else {
        HeaderStyle::Plain
    }
}

/// Lets `cmd.exe` interpret ANSI escape codes.
#[cfg(windows)]
pub(crate) fn enable_virtual_terminal() {
    use windows_sys::Win32::System::Console::{
        GetConsoleMode, GetStdHandle, SetConsoleMode, CONSOLE_MODE,
        ENABLE_VIRTUAL_TERMINAL_PROCESSING, STD_OUTPUT_HANDLE,
    };
    // SAFETY: the handle comes from GetStdHandle and `mode` outlives both calls.
    unsafe {
        let handle = GetStdHandle(STD_OUTPUT_HANDLE);
        let mut mode: CONSOLE_MODE = 0;
        if GetConsoleMode(handle, &mut mode) != 0 {
            SetConsoleMode(handle, mode | ENABLE_VIRTUAL_TERMINAL_PROCESSING);
        }
    }
}

#[cfg(not(windows))]
pub(crate) fn enable_virtual_terminal() {}
