use crate::app::App;

#[derive(Debug)]
pub enum AppCommand {
    Bootstrap,
    TabNext,
    TabTo { index: usize },
    UiToggleHelp,
    WordsRefresh,
    GenerateSong,
    SongsMoveUp,
    SongsMoveDown,
    PlayerTogglePause,
    PlayerStop,
    PlayerVolumeDown,
    PlayerVolumeUp,
    SongDownload,
    SubmitInputChar { c: char },
    SubmitInputBackspace,
    SubmitPillNext,
    SubmitPillPrev,
    SubmitActivate,
    ConfigMoveUp,
    ConfigMoveDown,
    ConfigInputChar { c: char },
    ConfigInputBackspace,
    ConfigClearAll,
    ConfigRemoveSelected,
    Quit,
}

#[derive(Debug)]
pub enum AppEvent {
    State(Box<App>),
    Toast(String),
    Error(String),
}
