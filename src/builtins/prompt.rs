use super::BuiltinIo;
use crate::prompt::Prompt;
use crate::shell::Shell;
use crate::status::{FAILURE, SUCCESS, Status};

/// `prompt TEMPLATE [DIRLEN]`
pub fn prompt(shell: &mut Shell, args: &[String], io: &mut BuiltinIo) -> Status {
    if !io.expect_args("prompt", args, &[1, 2]) {
        return FAILURE;
    }
    let max_dir_len = match args.get(1) {
        None => shell.prompt.max_dir_len,
        Some(n) => match n.parse() {
            Ok(n) => n,
            Err(_) => return io.fail(format!("prompt: invalid directory length '{n}'")),
        },
    };
    shell.prompt = Prompt::new(args[0].clone(), max_dir_len);
    SUCCESS
}

#[cfg(test)]
mod tests {
    use super::super::testing::{args, io};
    use super::*;

    #[test]
    fn replaces_template_and_keeps_length() {
        let mut sh = Shell::new();
        let len = sh.prompt.max_dir_len;
        let (mut io, _, _) = io("");
        assert_eq!(prompt(&mut sh, &args(&["%d> "]), &mut io), SUCCESS);
        assert_eq!(sh.prompt.template, "%d> ");
        assert_eq!(sh.prompt.max_dir_len, len);
    }

    #[test]
    fn sets_directory_length() {
        let mut sh = Shell::new();
        let (mut io, _, _) = io("");
        assert_eq!(prompt(&mut sh, &args(&["$ ", "10"]), &mut io), SUCCESS);
        assert_eq!(sh.prompt.max_dir_len, 10);
    }

    #[test]
    fn bad_length_keeps_old_prompt() {
        let mut sh = Shell::new();
        let before = sh.prompt.template.clone();
        let (mut io, _, _) = io("");
        assert_eq!(prompt(&mut sh, &args(&["$ ", "ten"]), &mut io), FAILURE);
        assert_eq!(sh.prompt.template, before);
    }
}
