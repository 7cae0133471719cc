#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    SessionOpen,
    SessionClose,
    LangsGet,
    LangsSet,
    LangsSwap,
    LanguagesList,
    SuggestInput,
    Translate,
    GrammarLoad,
    SavedToggle,
    SavedList,
    SavedDelete,
    HistoryList,
    HistoryDelete,
    HistoryClear,
    TtsSpeak,
    TtsFinished,
    TtsFailed,
    AuthDescribeError,
    AccountSendEmail,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "session.open" => Command::SessionOpen,
            "session.close" => Command::SessionClose,
            "langs.get" => Command::LangsGet,
            "langs.set" => Command::LangsSet,
            "langs.swap" => Command::LangsSwap,
            "languages.list" => Command::LanguagesList,
            "suggest.input" => Command::SuggestInput,
            "translate" => Command::Translate,
            "grammar.load" => Command::GrammarLoad,
            "saved.toggle" => Command::SavedToggle,
            "saved.list" => Command::SavedList,
            "saved.delete" => Command::SavedDelete,
            "history.list" => Command::HistoryList,
            "history.delete" => Command::HistoryDelete,
            "history.clear" => Command::HistoryClear,
            "tts.speak" => Command::TtsSpeak,
            "tts.finished" => Command::TtsFinished,
            "tts.failed" => Command::TtsFailed,
            "auth.describe_error" => Command::AuthDescribeError,
            "account.send_email" => Command::AccountSendEmail,
            _ => Command::Unknown,
        }
    }
}
