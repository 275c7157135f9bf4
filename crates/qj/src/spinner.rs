use std::io::Write;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub(crate) const FRAMES: [&str; 8] = [
    "[=   ]", "[==  ]", "[ == ]", "[  ==]", "[   =]", "[  ==]", "[ == ]", "[==  ]",
];
const TICK: Duration = Duration::from_millis(100);

/// Progress indicator drawn on stdout while queries are in flight.
pub(crate) struct Spinner {
    stop: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub(crate) fn start(enabled: bool) -> Self {
        let stop = CancellationToken::new();
        let task = enabled.then(|| {
            let stop = stop.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(TICK);
                let mut idx = 0usize;
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = interval.tick() => {
                            draw(&format!("\r{}", FRAMES[idx]));
                            idx = (idx + 1) % FRAMES.len();
                        }
                    }
                }
                draw(&format!("\r{}\r", " ".repeat(FRAMES[0].len())));
            })
        });
        Self { stop, task }
    }

    /// Stops drawing and clears the spinner line before returning.
    pub(crate) async fn stop(mut self) {
        self.stop.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

fn draw(frame: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(frame.as_bytes());
    let _ = stdout.flush();
}
