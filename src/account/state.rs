//! Derives whether the app needs a login from the accounts known on device.

use serde::{Deserialize, Serialize};

use crate::logging::LogCategory;

/// Status of a single account as reported by the account store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Ready,
    NotReady,
    Disabled,
    Removed,
    SecondFactorNeeded,
    CreateAddressNeeded,
    /// Any status this client does not know about.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    pub state: AccountStatus,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Account {
    pub fn is_ready(&self) -> bool {
        self.state == AccountStatus::Ready
    }

    pub fn is_disabled(&self) -> bool {
        self.state == AccountStatus::Disabled
    }
}

/// App-level login state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    Initial,
    LoginNeeded,
    Ready,
}

impl AccountState {
    pub fn code(self) -> i32 {
        match self {
            AccountState::Initial => 0,
            AccountState::LoginNeeded => 1,
            AccountState::Ready => 2,
        }
    }

    /// Next state given the current accounts. Accounts that are neither all
    /// disabled nor include a ready one (e.g. a login in progress) keep the
    /// previous state.
    pub fn derive(previous: AccountState, accounts: &[Account]) -> AccountState {
        if accounts.is_empty() || accounts.iter().all(Account::is_disabled) {
            AccountState::LoginNeeded
        } else if accounts.iter().any(Account::is_ready) {
            AccountState::Ready
        } else {
            previous
        }
    }
}

#[derive(Debug)]
pub struct AccountStateTracker {
    state: AccountState,
}

impl AccountStateTracker {
    pub fn new() -> Self {
        Self {
            state: AccountState::Initial,
        }
    }

    pub fn state(&self) -> AccountState {
        self.state
    }

    /// Feed the latest account list. Returns the new state only when it
    /// changed.
    pub fn update(&mut self, accounts: &[Account]) -> Option<AccountState> {
        let next = AccountState::derive(self.state, accounts);
        if next == self.state {
            return None;
        }
        log::info!(
            target: LogCategory::User.target(),
            "Account state {:?} -> {:?} ({} accounts)",
            self.state,
            next,
            accounts.len()
        );
        self.state = next;
        Some(next)
    }
}

impl Default for AccountStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str, state: AccountStatus) -> Account {
        Account {
            user_id: id.to_string(),
            username: None,
            state,
            session_id: None,
        }
    }

    #[test]
    fn no_accounts_needs_login() {
        assert_eq!(
            AccountState::derive(AccountState::Initial, &[]),
            AccountState::LoginNeeded
        );
        assert_eq!(
            AccountState::derive(
                AccountState::Ready,
                &[account("a", AccountStatus::Disabled), account("b", AccountStatus::Disabled)]
            ),
            AccountState::LoginNeeded
        );
    }

    #[test]
    fn any_ready_account_is_ready() {
        let accounts = [
            account("a", AccountStatus::Disabled),
            account("b", AccountStatus::Ready),
        ];
        assert_eq!(
            AccountState::derive(AccountState::LoginNeeded, &accounts),
            AccountState::Ready
        );
    }

    #[test]
    fn pending_accounts_keep_previous_state() {
        let accounts = [account("a", AccountStatus::SecondFactorNeeded)];
        assert_eq!(
            AccountState::derive(AccountState::Initial, &accounts),
            AccountState::Initial
        );
        assert_eq!(
            AccountState::derive(AccountState::LoginNeeded, &accounts),
            AccountState::LoginNeeded
        );
    }

    #[test]
    fn tracker_reports_only_changes() {
        let mut tracker = AccountStateTracker::new();
        assert_eq!(tracker.state(), AccountState::Initial);
        assert_eq!(tracker.update(&[]), Some(AccountState::LoginNeeded));
        assert_eq!(tracker.update(&[]), None);
        let ready = [account("a", AccountStatus::Ready)];
        assert_eq!(tracker.update(&ready), Some(AccountState::Ready));
        assert_eq!(tracker.update(&ready), None);
        assert_eq!(tracker.state().code(), 2);
    }

    #[test]
    fn unknown_status_does_not_reject_the_list() {
        let accounts: Vec<Account> = serde_json::from_str(
            r#"[{"userId":"u1","state":"ready"},{"userId":"u2","state":"two_pass_mode_needed"}]"#,
        )
        .unwrap();
        assert_eq!(accounts[1].state, AccountStatus::Other);
        assert_eq!(
            AccountState::derive(AccountState::LoginNeeded, &accounts),
            AccountState::Ready
        );

        let pending: Vec<Account> =
            serde_json::from_str(r#"[{"userId":"u3","state":"migration_needed"}]"#).unwrap();
        assert_eq!(
            AccountState::derive(AccountState::Initial, &pending),
            AccountState::Initial
        );
        assert_eq!(
            AccountState::derive(AccountState::LoginNeeded, &pending),
            AccountState::LoginNeeded
        );
    }

    #[test]
    fn parses_account_json() {
        let accounts: Vec<Account> = serde_json::from_str(
            r#"[{"userId":"u1","state":"ready","sessionId":"s1"},{"userId":"u2","state":"disabled"}]"#,
        )
        .unwrap();
        assert!(accounts[0].is_ready());
        assert!(accounts[1].is_disabled());
    }
}
