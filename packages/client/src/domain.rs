//! Domain logic for client-side operations.
//!
//! Pure functions without side effects, so the reconnect policy can be
//! tested in isolation.

use crate::error::ClientError;

/// Prefix the relay interprets as a display name change
const NAME_CHANGE_PREFIX: &str = "my name:";

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Line announcing `name` to the relay
pub fn name_change_line(name: &str) -> String {
    format!("{}{}", NAME_CHANGE_PREFIX, name)
}

/// Strip the relay's line terminator for display
pub fn display_text(frame: &str) -> &str {
    frame.trim_end_matches(['\r', '\n'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_invalid_url() {
        // テスト項目: InvalidUrl エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::InvalidUrl("nope".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 最大試行回数未満なら再接続を試みる
        // given (前提条件):
        let error = ClientError::ConnectionLost;

        // when (操作):
        let first = should_attempt_reconnect(&error, 0, 5);
        let last = should_attempt_reconnect(&error, 4, 5);
        let exhausted = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(first);
        assert!(last);
        assert!(!exhausted);
    }

    #[test]
    fn test_should_not_reconnect_on_invalid_url() {
        // テスト項目: 即座に終了すべきエラーでは試行回数に関係なく再接続しない
        // given (前提条件):
        let error = ClientError::InvalidUrl("ftp://relay".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_name_change_line() {
        // テスト項目: 名前変更の行が "my name:" 付きで生成される
        assert_eq!(name_change_line("Alice"), "my name:Alice");
        assert_eq!(name_change_line(""), "my name:");
    }

    #[test]
    fn test_display_text_strips_line_terminator() {
        // テスト項目: 表示用に末尾の CRLF だけが取り除かれる
        assert_eq!(
            display_text("[client Bob] message hi\r\n"),
            "[client Bob] message hi"
        );
        assert_eq!(display_text("[self Bob] sent: hi"), "[self Bob] sent: hi");
        assert_eq!(display_text("  padded  \r\n"), "  padded  ");
    }
}
