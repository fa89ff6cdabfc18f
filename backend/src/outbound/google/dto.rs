//! Wire shapes for the Directory API `users.insert` call.

use serde::{Deserialize, Serialize};

use crate::domain::ProvisionedAccount;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InsertUserDto<'a> {
    pub(super) primary_email: &'a str,
    pub(super) name: UserNameDto<'a>,
    pub(super) password: &'a str,
    pub(super) change_password_at_next_login: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) recovery_email: Option<&'a str>,
    pub(super) external_ids: Vec<ExternalIdDto<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserNameDto<'a> {
    pub(super) given_name: &'a str,
    pub(super) family_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ExternalIdDto<'a> {
    #[serde(rename = "type")]
    pub(super) kind: &'a str,
    pub(super) value: &'a str,
}

impl<'a> From<&'a ProvisionedAccount> for InsertUserDto<'a> {
    fn from(account: &'a ProvisionedAccount) -> Self {
        Self {
            primary_email: account.primary_email().as_ref(),
            name: UserNameDto {
                given_name: account.name().given_name.as_str(),
                family_name: account.name().family_name.as_str(),
            },
            password: account.password().expose(),
            change_password_at_next_login: account.change_password_at_next_login(),
            recovery_email: account.recovery_email(),
            external_ids: account
                .external_ids()
                .iter()
                .map(|id| ExternalIdDto {
                    kind: id.kind.as_str(),
                    value: id.value.as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InsertedUserDto {
    #[serde(default)]
    pub(super) primary_email: Option<String>,
}

/// Google API error envelope: `{"error":{"code":409,"message":"..."}}`.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}
