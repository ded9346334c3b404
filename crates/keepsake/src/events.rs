use gdk_pixbuf::Pixbuf;
use orbit::control::ControlCommand;
use orbit::{LayoutKind, SourceRef};

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    SetLayout(LayoutKind),
    ConfigReload,
    ImageLoaded(SourceRef, Option<Pixbuf>),
}

impl From<ControlCommand> for AppEvent {
    fn from(cmd: ControlCommand) -> Self {
        match cmd {
            ControlCommand::Show => AppEvent::Show,
            ControlCommand::Hide => AppEvent::Hide,
            ControlCommand::Sphere => AppEvent::SetLayout(LayoutKind::Sphere),
            ControlCommand::Ribbon => AppEvent::SetLayout(LayoutKind::Ribbon),
            ControlCommand::Reload => AppEvent::ConfigReload,
        }
    }
}
