#[derive(Clone, Debug)]
pub enum Message {
    /// Request a client route; resolved against the session
    Navigate(String),
    ClearFeedback,
}

impl Message {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "Ui::Navigate",
            Self::ClearFeedback => "Ui::ClearFeedback",
        }
    }
}
