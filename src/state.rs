//! The three-state view published by each paginated channel.

/// Loading / success / error, exactly one active at a time.
///
/// A request always publishes `Loading` first and then exactly one of
/// `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum State<T> {
    #[default]
    Loading,
    Success(T),
    Error(String),
}

impl<T> State<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, State::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// The payload, if this is a success.
    pub fn data(&self) -> Option<&T> {
        match self {
            State::Success(data) => Some(data),
            State::Loading | State::Error(_) => None,
        }
    }

    /// The error message, if this is an error.
    pub fn message(&self) -> Option<&str> {
        match self {
            State::Error(message) => Some(message),
            State::Loading | State::Success(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> State<U> {
        match self {
            State::Loading => State::Loading,
            State::Success(data) => State::Success(f(data)),
            State::Error(message) => State::Error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_loading() {
        let state: State<u32> = State::default();
        assert!(state.is_loading());
        assert!(state.data().is_none());
        assert!(state.message().is_none());
    }

    #[test]
    fn accessors_match_variant() {
        let ok = State::Success(3);
        assert_eq!(ok.data(), Some(&3));
        assert!(!ok.is_error());

        let err: State<u32> = State::Error("Unable to connect".into());
        assert!(err.is_error());
        assert_eq!(err.message(), Some("Unable to connect"));
    }

    #[test]
    fn map_keeps_variant() {
        assert_eq!(State::Success(2).map(|n| n * 10), State::Success(20));
        assert_eq!(State::<u32>::Loading.map(|n| n * 10), State::Loading);
        assert_eq!(
            State::<u32>::Error("x".into()).map(|n| n * 10),
            State::Error("x".into())
        );
    }
}
