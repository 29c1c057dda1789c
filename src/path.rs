use alloc::string::String;
use core::fmt;

/// A `/`-separated path as the build framework sees it.
#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Path(String);

const SEP: &str = "/";

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.0)
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Self(path.replace("\\", "/"))
    }
}

impl From<String> for Path {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_extension(&self, suffix: &str) -> Self {
        let path = &self.0;
        let search_start = path.rfind(SEP).map(|i| i + 1).unwrap_or(0);
        let last_dot = path[search_start..].rfind('.').map(|i| search_start + i);

        let mut new_path = match last_dot {
            Some(dot_pos) => String::from(&path[..dot_pos]),
            None => String::from(path.as_str()),
        };
        if !suffix.starts_with('.') {
            new_path.push('.');
        }
        new_path.push_str(suffix);
        Self(new_path)
    }

    pub fn join(&self, path: impl AsRef<str>) -> Self {
        if path.as_ref().starts_with(SEP) || self.0.is_empty() {
            return Self::from(path.as_ref());
        }

        let mut new_path = String::from(self.0.trim_end_matches(SEP));
        new_path.push_str(SEP);
        new_path.push_str(path.as_ref());
        Self::from(new_path)
    }

    /// Last component, or the whole path when it has no separator.
    pub fn file_name(&self) -> &str {
        let path = self.0.trim_end_matches(SEP);
        match path.rfind(SEP) {
            Some(i) => &path[i + 1..],
            None => path,
        }
    }

    /// Everything before the last component. Empty for a bare file name.
    pub fn parent(&self) -> Self {
        let path = self.0.trim_end_matches(SEP);
        match path.rfind(SEP) {
            Some(0) => Self(String::from(SEP)),
            Some(i) => Self(String::from(&path[..i])),
            None => Self::new(),
        }
    }
}
