//! Prompt template rendering.
//!
//! | escape | expands to |
//! |--------|------------|
//! | `%u`   | user name |
//! | `%h`   | host name |
//! | `%d`   | working directory, `~` for home, shortened to the configured length |
//! | `%s`   | status of the previous line |
//! | `%$`   | `#` for root, `$` otherwise |
//! | `%%`   | a literal `%` |

use std::path::{Path, PathBuf};

use log::warn;

use crate::status::Status;

/// Marker prepended to a shortened directory.
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone)]
pub struct Prompt {
    pub template: String,
    /// Maximum number of characters shown for `%d`; `0` disables shortening.
    pub max_dir_len: usize,
}

/// Everything a template can refer to.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub user: String,
    pub host: String,
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub status: Status,
    pub root: bool,
}

impl PromptContext {
    /// Gather the context from the running process.
    pub fn current(status: Status, home: Option<PathBuf>) -> Self {
        Self {
            user: std::env::var("USER").unwrap_or_default(),
            host: host_name().unwrap_or_default(),
            cwd: std::env::current_dir().unwrap_or_default(),
            home,
            status,
            // SAFETY: geteuid has no preconditions and cannot fail.
            root: unsafe { libc::geteuid() } == 0,
        }
    }
}

impl Prompt {
    pub fn new(template: impl Into<String>, max_dir_len: usize) -> Self {
        Self {
            template: template.into(),
            max_dir_len,
        }
    }

    /// Render against the live process state.
    pub fn render(&self, status: Status, home: Option<PathBuf>) -> String {
        self.expand(&PromptContext::current(status, home))
    }

    pub fn expand(&self, ctx: &PromptContext) -> String {
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut chars = self.template.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('u') => out.push_str(&ctx.user),
                Some('h') => out.push_str(&ctx.host),
                Some('d') => out.push_str(&self.directory(&ctx.cwd, ctx.home.as_deref())),
                Some('s') => out.push_str(&ctx.status.to_string()),
                Some('$') => out.push(if ctx.root { '#' } else { '$' }),
                Some('%') => out.push('%'),
                Some(other) => warn!("prompt: unknown escape '%{other}'"),
                None => out.push('%'),
            }
        }
        out
    }

    fn directory(&self, cwd: &Path, home: Option<&Path>) -> String {
        let shown = match home.and_then(|h| cwd.strip_prefix(h).ok()) {
            Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
            Some(rest) => format!("~/{}", rest.display()),
            None => cwd.display().to_string(),
        };
        shorten(&shown, self.max_dir_len)
    }
}

/// Keep at most `max` trailing characters of `dir`, cutting at a `/`.
fn shorten(dir: &str, max: usize) -> String {
    let count = dir.chars().count();
    if max == 0 || count <= max {
        return dir.to_string();
    }
    let tail: String = dir.chars().skip(count - max).collect();
    match tail.find('/') {
        Some(slash) => format!("{ELLIPSIS}{}", &tail[slash..]),
        None => format!("{ELLIPSIS}{tail}"),
    }
}

fn host_name() -> Option<String> {
    let mut buf = [0u8; 256];
    // SAFETY: the buffer is valid for `buf.len()` bytes; gethostname writes
    // at most that many and we stop at the first NUL.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    Some(String::from_utf8_lossy(&buf[..end]).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(cwd: &str) -> PromptContext {
        PromptContext {
            user: "jo".into(),
            host: "box".into(),
            cwd: PathBuf::from(cwd),
            home: Some(PathBuf::from("/home/jo")),
            status: 0,
            root: false,
        }
    }

    #[test]
    fn expands_all_escapes() {
        let p = Prompt::new("%u@%h[%s]:%d%$ ", 0);
        assert_eq!(p.expand(&ctx("/home/jo/src")), "jo@box[0]:~/src$ ");
    }

    #[test]
    fn home_itself_is_tilde() {
        let p = Prompt::new("%d", 0);
        assert_eq!(p.expand(&ctx("/home/jo")), "~");
    }

    #[test]
    fn outside_home_is_absolute() {
        let p = Prompt::new("%d", 0);
        assert_eq!(p.expand(&ctx("/home/joe")), "/home/joe");
        assert_eq!(p.expand(&ctx("/tmp")), "/tmp");
    }

    #[test]
    fn root_and_status() {
        let p = Prompt::new("%s%$", 0);
        let mut c = ctx("/");
        c.root = true;
        c.status = 127;
        assert_eq!(p.expand(&c), "127#");
    }

    #[test]
    fn literal_percent_and_unknown_escape() {
        let p = Prompt::new("100%% %q!%", 0);
        assert_eq!(p.expand(&ctx("/")), "100% !%");
    }

    #[test]
    fn long_directories_are_cut_at_a_slash() {
        assert_eq!(shorten("/usr/local/share/doc", 10), ".../share/doc");
        assert_eq!(shorten("/usr/local", 10), "/usr/local");
        assert_eq!(shorten("/averyverylongname", 5), "...gname");
    }

    #[test]
    fn host_name_is_available() {
        assert!(host_name().is_some());
    }
}
