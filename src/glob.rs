use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::os::{Os, Path, Result};

/// A file pattern: a literal directory plus a file-name pattern that may use
/// `*` and `?`.
#[derive(Clone, PartialEq, Eq)]
pub struct Glob {
    dir: Path,
    pattern: String,
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir.join(&self.pattern))
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glob({self})")
    }
}

impl Glob {
    pub fn new(dir: Path, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self { dir, pattern }
    }

    /// Hidden names only match a pattern that itself starts with `.`.
    pub fn matches(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.pattern.starts_with('.') {
            return false;
        }
        wildcard_match(self.pattern.as_bytes(), name.as_bytes())
    }

    /// Sorted list of matching entries. A missing directory matches nothing.
    pub fn expand(&self, os: &dyn Os) -> Result<Vec<Path>> {
        if !os.is_dir(&self.dir)? {
            return Ok(Vec::new());
        }

        let mut paths = os
            .list_dir(&self.dir)?
            .into_iter()
            .filter(|path| self.matches(path.file_name()))
            .collect::<Vec<_>>();
        paths.sort();
        Ok(paths)
    }
}

fn wildcard_match(pattern: &[u8], name: &[u8]) -> bool {
    let (mut p, mut n) = (0, 0);
    // Position of the last `*` and the name index it is currently absorbing up to.
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some(b'*') => {
                star = Some((p, n));
                p += 1;
            }
            Some(b'?') => {
                p += 1;
                n += 1;
            }
            Some(c) if *c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match star {
                Some((sp, sn)) => {
                    p = sp + 1;
                    n = sn + 1;
                    star = Some((sp, sn + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == b'*')
}
