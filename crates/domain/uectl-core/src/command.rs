/// Which commands were requested for this invocation.
///
/// `suspend`, `resume` and `cancel` are checked in that order and each one
/// ends the invocation on its own. `update` and `follow` may be combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandSelection {
    pub update: bool,
    pub suspend: bool,
    pub resume: bool,
    pub cancel: bool,
    pub follow: bool,
}

impl CommandSelection {
    pub fn is_empty(&self) -> bool {
        !(self.update || self.suspend || self.resume || self.cancel || self.follow)
    }
}
