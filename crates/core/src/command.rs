use std::str::FromStr;

use thiserror::Error;

use crate::host::{EditorHost, ViewId};
use crate::listing::NavigationTarget;
use crate::sync::{EditorEvents, Synchronizer};

/// 主機可觸發的書籤指令。 / Commands the host can dispatch to the bookmark engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 清除作用中檔案的書籤。 / Clear markers in the active file.
    ClearFile,
    /// 清除所有書籤。 / Clear every marker in the workspace.
    ClearAll,
    /// 列出並跳至書籤。 / List markers and jump to the chosen one.
    List,
    /// 檔案即將關閉。 / Lifecycle hook: the file in the view is closing.
    FileClosed(ViewId),
    /// 檔案載入完成。 / Lifecycle hook: the file in the view finished loading.
    FileLoaded(ViewId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown bookmark command: {0}")]
    UnknownCommand(String),
}

impl FromStr for Command {
    type Err = CommandError;

    /// 解析主機的指令名稱。 / Parses the action names used in host key bindings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "clearfile" | "clear_file" => Ok(Command::ClearFile),
            "clearall" | "clear_all" => Ok(Command::ClearAll),
            "list" => Ok(Command::List),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

impl Synchronizer {
    /// 執行指令；僅 `List` 會回傳導覽目標。 / Runs a command. Only `List` yields a
    /// navigation target.
    pub fn dispatch<H>(&mut self, host: &mut H, command: Command) -> Option<NavigationTarget>
    where
        H: EditorHost + ?Sized,
    {
        log::trace!("dispatching {command:?}");
        match command {
            Command::ClearFile => self.clear_file(host),
            Command::ClearAll => self.clear_all(host),
            Command::List => return self.list(host),
            Command::FileClosed(view) => self.on_close(host, view),
            Command::FileLoaded(view) => self.on_open(host, view),
        }
        None
    }
}
