use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, warn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use jsh::config::Config;
use jsh::{SUCCESS, Shell, Status, logging, signals};

#[derive(Parser)]
#[command(name = "jsh")]
#[command(about = "A basic UNIX shell with context-aware aliases and grouped expressions")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Turn printing of debug messages on
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Turn printing of debug messages off
    #[arg(short = 'n', long = "nodebug")]
    nodebug: bool,

    /// Turn coloring of jsh messages on
    #[arg(short = 'c', long = "color")]
    color: bool,

    /// Turn coloring of jsh messages off
    #[arg(short = 'o', long = "nocolor")]
    nocolor: bool,

    /// Do not source the rc file at startup
    #[arg(short = 'f', long = "norc")]
    norc: bool,

    /// Display version information
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Script to run instead of reading commands from stdin
    #[arg()]
    script: Option<PathBuf>,
}

/// Command-line flags win over the configured value.
fn choose(on: bool, off: bool, configured: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        configured
    }
}

fn main() {
    let cli = Cli::parse();
    if cli.version {
        println!("jsh {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let config = Config::load();
    let debug = choose(cli.debug, cli.nodebug, config.settings.debug);
    let color = choose(cli.color, cli.nocolor, config.settings.color);
    logging::init(debug, color);
    if let Err(e) = signals::install() {
        warn!("couldn't install SIGINT handler: {e}");
    }

    let mut shell = Shell::from_config(&config);
    shell.flags.debug = debug;
    shell.flags.color = color;
    shell.flags.interactive =
        cli.script.is_none() && io::stdin().is_terminal() && io::stdout().is_terminal();
    shell.watch_interrupts(true);

    if config.settings.load_rc
        && !cli.norc
        && let Some(rc) = config.settings.rc_path()
        && rc.exists()
    {
        source_or_report(&mut shell, &rc);
    }

    let code = if let Some(code) = shell.exit_code() {
        code
    } else if let Some(script) = &cli.script {
        source_or_report(&mut shell, script)
    } else if shell.flags.interactive {
        repl(&mut shell, config.settings.history_path())
    } else {
        run_stdin(&mut shell)
    };
    std::process::exit(code);
}

fn source_or_report(shell: &mut Shell, path: &Path) -> Status {
    match shell.source_file(path) {
        Ok(status) => shell.exit_code().unwrap_or(status),
        Err(e) => {
            shell.report(&e);
            jsh::FAILURE
        }
    }
}

/// Interactive loop with line editing and persistent history.
fn repl(shell: &mut Shell, history: Option<PathBuf>) -> Status {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            shell.report(&e);
            return run_stdin(shell);
        }
    };
    if let Some(path) = &history
        && let Err(e) = editor.load_history(path)
    {
        debug!("history: nothing loaded from '{}': {e}", path.display());
    }
    shell.seed_history(editor.history().iter().cloned());

    while shell.exit_code().is_none() {
        signals::clear_interrupt();
        let home = shell.home_dir().map(Path::to_path_buf);
        let prompt = shell.prompt.render(shell.last_status(), home);
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                shell.record_history(&line);
                shell.eval_line(&line);
                if signals::take_interrupt() {
                    eprintln!();
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                shell.report(&e);
                break;
            }
        }
    }

    if let Some(path) = &history
        && let Err(e) = editor.save_history(path)
    {
        warn!("history: couldn't save to '{}': {e}", path.display());
    }
    shell.exit_code().unwrap_or(SUCCESS)
}

/// Evaluate stdin line by line, without a prompt.
///
/// Stdin is locked one line at a time; builtins on the line read the same
/// stream and may consume what follows.
fn run_stdin(shell: &mut Shell) -> Status {
    let mut buf = String::new();
    loop {
        buf.clear();
        match io::stdin().read_line(&mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                shell.report(&e);
                break;
            }
        }
        let line = buf.strip_suffix('\n').unwrap_or(&buf);
        let line = line.strip_suffix('\r').unwrap_or(line).to_string();
        if line.trim().is_empty() {
            continue;
        }
        signals::clear_interrupt();
        shell.record_history(&line);
        shell.eval_line(&line);
        if shell.exit_code().is_some() {
            break;
        }
    }
    shell.exit_code().unwrap_or(shell.last_status())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        assert!(choose(true, false, false));
        assert!(!choose(false, true, true));
        assert!(choose(false, false, true));
        assert!(!choose(false, false, false));
    }

    #[test]
    fn cli_parses_short_flags() {
        let cli = Cli::try_parse_from(["jsh", "-d", "-o", "-f", "script.jsh"]).unwrap();
        assert!(cli.debug);
        assert!(cli.nocolor);
        assert!(cli.norc);
        assert_eq!(cli.script, Some(PathBuf::from("script.jsh")));
    }

    #[test]
    fn cli_rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["jsh", "--bogus"]).is_err());
    }
}
