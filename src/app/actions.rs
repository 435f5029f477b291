use crate::view::ViewMode;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,

    // Navigation
    SetView(ViewMode),
    NavUp,
    NavDown,
    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,
    ToggleHelp,

    // Playback
    Activate,
    TogglePause,
    PlayNext,
    PlayPrev,
    ToggleRepeatMode,
    ToggleShuffle,
    VolumeUp,
    VolumeDown,
    ToggleMute,
    SeekForward,
    SeekBack,

    // Catalog mutation
    ToggleLikeSelected,
    ToggleLikeCurrent,
    RemoveSelected,
    DeleteSelected,
    ConfirmDelete,
    CancelDelete,

    // Text entry (search bar and prompts)
    FocusSearch,
    InputChar(char),
    Backspace,
    ClearInput,
    SubmitInput,
    LeaveInput,

    // Session
    OpenLogin,
    OpenRegister,
    OpenUpload,
    Logout,
    PromptFieldNext,

    Refresh,
    Resize,
}
