use std::io::Write;

use super::{BuiltinIo, on_off};
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// `color on|off`
pub fn color(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    toggle("color", args, io, |on| shell.set_color(on))
}

/// `debug on|off`
pub fn debug(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    toggle("debug", args, io, |on| shell.set_debug(on))
}

fn toggle(name: &str, args: &[String], io: &mut BuiltinIo, set: impl FnOnce(bool)) -> Status {
    if !io.expect_args(name, args, &[1]) {
        return FAILURE;
    }
    let Some(on) = on_off(&args[0]) else {
        return io.fail(format!("{name}: expected 'on' or 'off', got '{}'", args[0]));
    };
    set(on);
    let state = if on { "on" } else { "off" };
    let _ = writeln!(io.stdout, "jsh: {name} mode {state}");
    SUCCESS
}
