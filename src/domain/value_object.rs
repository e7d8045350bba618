//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 8;

/// Room code value object.
///
/// A human-shareable match code: exactly 8 characters out of A-Z0-9.
/// Lowercase input is normalized to uppercase so a hand-typed code
/// still matches the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    /// Create a new RoomCode.
    ///
    /// # Arguments
    ///
    /// * `code` - The room code string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomCode or an error if validation fails
    pub fn new(code: String) -> Result<Self, ValueObjectError> {
        let code = code.to_ascii_uppercase();
        let len = code.chars().count();
        if len != ROOM_CODE_LEN {
            return Err(ValueObjectError::RoomCodeInvalidLength {
                expected: ROOM_CODE_LEN,
                actual: len,
            });
        }
        if let Some(invalid) = code
            .chars()
            .find(|c| !c.is_ascii_uppercase() && !c.is_ascii_digit())
        {
            return Err(ValueObjectError::RoomCodeInvalidChar(invalid));
        }
        Ok(Self(code))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection identifier value object.
///
/// Represents the opaque identifier of one connected participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new ConnectionId.
    ///
    /// # Arguments
    ///
    /// * `id` - The connection identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the ConnectionId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        let len = id.len();
        if len > 100 {
            return Err(ValueObjectError::ConnectionIdTooLong {
                max: 100,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two roles a participant may hold in a room.
///
/// First is simulation-authoritative: it is the single writer of ball
/// physics and score increments. Second only applies broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    First,
    Second,
}

impl Role {
    /// The role held by the other participant of the room.
    pub fn peer(&self) -> Role {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::First => write!(f, "first"),
            Role::Second => write!(f, "second"),
        }
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    ///
    /// # Arguments
    ///
    /// * `value` - Unix timestamp in milliseconds
    ///
    /// # Returns
    ///
    /// A Timestamp instance
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_new_success() {
        // テスト項目: 有効なルームコードを作成できる
        // given (前提条件):
        let code = "AB12CD34".to_string();

        // when (操作):
        let result = RoomCode::new(code);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "AB12CD34");
    }

    #[test]
    fn test_room_code_normalizes_lowercase() {
        // テスト項目: 小文字のルームコードは大文字に正規化される
        // when (操作):
        let result = RoomCode::new("ab12cd34".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "AB12CD34");
    }

    #[test]
    fn test_room_code_wrong_length_fails() {
        // テスト項目: 8文字以外のルームコードは作成できない
        // when (操作):
        let result = RoomCode::new("AB12".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomCodeInvalidLength {
                expected: 8,
                actual: 4
            }
        );
    }

    #[test]
    fn test_room_code_invalid_char_fails() {
        // テスト項目: 英数字以外を含むルームコードは作成できない
        // when (操作):
        let result = RoomCode::new("AB12CD3!".to_string());

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomCodeInvalidChar('!')
        );
    }

    #[test]
    fn test_connection_id_new_success() {
        // テスト項目: 有効な接続 ID を作成できる
        // when (操作):
        let result = ConnectionId::new("conn-1".to_string());

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "conn-1");
    }

    #[test]
    fn test_connection_id_empty_fails() {
        // テスト項目: 空の接続 ID は作成できない
        // when (操作):
        let result = ConnectionId::new("".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ConnectionIdEmpty);
    }

    #[test]
    fn test_connection_id_too_long_fails() {
        // テスト項目: 101 文字以上の接続 ID は作成できない
        // when (操作):
        let result = ConnectionId::new("a".repeat(101));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::ConnectionIdTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_role_peer() {
        // テスト項目: 相手側のロールを取得できる
        assert_eq!(Role::First.peer(), Role::Second);
        assert_eq!(Role::Second.peer(), Role::First);
    }

    #[test]
    fn test_role_serialization() {
        // テスト項目: ロールは camelCase で直列化される
        assert_eq!(serde_json::to_string(&Role::First).unwrap(), "\"first\"");
        assert_eq!(serde_json::to_string(&Role::Second).unwrap(), "\"second\"");
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }
}
