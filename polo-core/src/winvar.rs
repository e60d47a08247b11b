//! translation of Windows-style variables and paths
//!
//! Policy records carry `%VAR%` tokens and Windows paths that have to be
//! mapped onto the local filesystem before any applier can use them.

/// Caller-supplied substitution context. Lookups against the user database
/// or XDG dirs are the caller's business; defaults target `/etc/skel` so
/// machine-context expansion works without a logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarContext {
    username: Option<String>,
    home_dir: Option<String>,
    desktop_dir: Option<String>,
}

impl VarContext {
    /// Machine context: no user, skeleton home
    pub fn machine() -> Self {
        Self::default()
    }

    /// User context for `username` with their resolved home directory
    pub fn user(username: impl Into<String>, home_dir: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            home_dir: Some(home_dir.into()),
            desktop_dir: None,
        }
    }

    /// Override the desktop directory (normally resolved via XDG)
    pub fn with_desktop_dir(mut self, dir: impl Into<String>) -> Self {
        self.desktop_dir = Some(dir.into());
        self
    }

    fn variables(&self) -> Vec<(&'static str, String)> {
        let home = self
            .home_dir
            .clone()
            .unwrap_or_else(|| "/etc/skel".to_owned());
        let start_menu = match &self.username {
            Some(_) => format!("{home}/.local/share/applications"),
            None => "/usr/share/applications".to_owned(),
        };
        let desktop = self
            .desktop_dir
            .clone()
            .unwrap_or_else(|| format!("{home}/Desktop"));

        let mut vars = vec![
            ("HOME", home.clone()),
            ("HOMEPATH", home),
            ("HOMEDRIVE", "/".to_owned()),
            ("SystemRoot", "/".to_owned()),
            ("SystemDrive", "/".to_owned()),
            ("StartMenuDir", start_menu),
            ("DesktopDir", desktop),
        ];
        if let Some(user) = &self.username {
            vars.push(("LogonUser", user.clone()));
        }
        vars
    }
}

/// Scan `text` for percent-encoded variables and expand them. Expanded
/// values are slash-terminated and doubled slashes collapsed, so
/// `%HOME%file` and `%HOME%/file` both come out well-formed.
pub fn expand_windows_var(text: &str, ctx: &VarContext) -> String {
    let mut result = text.to_owned();
    for (name, value) in ctx.variables() {
        let value = if value.ends_with('/') {
            value
        } else {
            format!("{value}/")
        };
        result = result
            .replace(&format!("%{name}%"), &value)
            .replace("//", "/");
    }
    result
}

/// Try to make a Windows path look like UNIX. Only `.exe` paths are
/// rewritten: lowercased, backslashes to slashes, extension stripped,
/// and reduced to the bare program name.
pub fn transform_windows_path(text: &str) -> String {
    if !text.to_lowercase().ends_with(".exe") {
        return text.to_owned();
    }
    let unix = text.to_lowercase().replace('\\', "/").replace(".exe", "");
    unix.rsplit('/').next().unwrap_or_default().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_context_expands_to_skel() {
        let ctx = VarContext::machine();
        assert_eq!(
            expand_windows_var("%HOME%/wallpaper.png", &ctx),
            "/etc/skel/wallpaper.png"
        );
        assert_eq!(
            expand_windows_var("%StartMenuDir%editor.desktop", &ctx),
            "/usr/share/applications/editor.desktop"
        );
    }

    #[test]
    fn user_context_expands_home_and_logon_user() {
        let ctx = VarContext::user("alice", "/home/alice");
        assert_eq!(
            expand_windows_var("%HOMEPATH%/docs", &ctx),
            "/home/alice/docs"
        );
        assert_eq!(expand_windows_var("%LogonUser%", &ctx), "alice/");
        assert_eq!(
            expand_windows_var("%StartMenuDir%/editor.desktop", &ctx),
            "/home/alice/.local/share/applications/editor.desktop"
        );
    }

    #[test]
    fn doubled_slashes_collapse() {
        let ctx = VarContext::user("alice", "/home/alice/");
        assert_eq!(
            expand_windows_var("%HOME%//pictures", &ctx),
            "/home/alice/pictures"
        );
    }

    #[test]
    fn desktop_dir_override() {
        let ctx = VarContext::user("alice", "/home/alice").with_desktop_dir("/home/alice/Рабочий стол");
        assert_eq!(
            expand_windows_var("%DesktopDir%link.desktop", &ctx),
            "/home/alice/Рабочий стол/link.desktop"
        );
    }

    #[test]
    fn exe_paths_become_bare_program_names() {
        assert_eq!(
            transform_windows_path("C:\\Windows\\System32\\Notepad.EXE"),
            "notepad"
        );
        assert_eq!(transform_windows_path("firefox.exe"), "firefox");
    }

    #[test]
    fn non_exe_paths_pass_through() {
        assert_eq!(
            transform_windows_path("\\\\dc1\\share\\logon.bat"),
            "\\\\dc1\\share\\logon.bat"
        );
        assert_eq!(transform_windows_path("/usr/bin/true"), "/usr/bin/true");
    }
}
