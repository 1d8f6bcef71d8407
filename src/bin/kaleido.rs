use std::{
    io::Write as _,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::Parser;
use kaleido::{Console, Engine, LineReader, MemoryStage, Scene, Signal, catalog, input::LinePoll};

#[derive(Parser, Debug)]
#[command(name = "kaleido", version)]
struct Cli {
    /// Syntax map file (JSON: syntax name -> keyword -> operation). The
    /// built-in keyword set is used when omitted.
    #[arg(long = "syntax-file")]
    syntax_file: Option<PathBuf>,

    /// Syntax name to load from the syntax file.
    #[arg(long, default_value = "default")]
    syntax: String,

    /// Tick rate of the frame loop.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the random-creation commands.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut console = match &cli.syntax_file {
        Some(path) => Console::from_syntax_file(path, &cli.syntax)
            .with_context(|| format!("load syntax '{}' from '{}'", cli.syntax, path.display()))?,
        None => Console::from_syntax(Console::default_syntax()),
    };

    let mut scene = Scene::new(cli.seed);
    catalog::register_builtin(&mut scene);
    let mut stage = MemoryStage::new();

    let reader = LineReader::spawn();
    let frame = Duration::from_secs_f64(1.0 / f64::from(cli.fps.max(1)));

    prompt(&console, &scene)?;

    let mut last = Instant::now();
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f64();
        last = now;

        Engine::tick(&mut scene.root, &mut stage, dt);

        match reader.poll() {
            LinePoll::Line(line) => {
                let quit = {
                    let mut stdout = std::io::stdout().lock();
                    match console.interpret(&mut scene, &mut stage, &line, &mut stdout) {
                        Ok(Signal::Quit) => true,
                        Ok(Signal::Continue) => false,
                        Err(err) => {
                            tracing::warn!(%err, "command failed");
                            false
                        }
                    }
                };
                if quit {
                    break;
                }
                prompt(&console, &scene)?;
            }
            LinePoll::Idle => {}
            LinePoll::Eof => break,
        }

        let spent = now.elapsed();
        if spent < frame {
            thread::sleep(frame - spent);
        }
    }

    Ok(())
}

fn prompt(console: &Console, scene: &Scene) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{}", console.context_string(scene))?;
    stdout.flush()?;
    Ok(())
}
