//
//  deployer-client
//  api/resources/options.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Deploy target settings.
//!
//! Each target carries one settings block per target type, addressed on the wire
//! as `<type>_option`. SSH hosts travel as a single comma-joined string and are
//! exposed here as a list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::api::client::{DeployerClient, Method};
use crate::api::common::{param_text, DeployerError, HashEnvelope, Params};
use crate::config::CategoryResolver;

/// Canonical deploy target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Plain SSH hosts
    Ssh,
    /// Google App Engine
    Gae,
    /// Amazon Web Services
    Aws,
    /// Force.com
    For,
}

impl TargetType {
    /// Every canonical type.
    pub const ALL: [TargetType; 4] = [TargetType::Ssh, TargetType::Gae, TargetType::Aws, TargetType::For];

    /// Wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetType::Ssh => "ssh",
            TargetType::Gae => "gae",
            TargetType::Aws => "aws",
            TargetType::For => "for",
        }
    }

    /// Name of the settings block for this type, e.g. `ssh_option`.
    pub fn option_name(self) -> String {
        format!("{}_option", self.as_str())
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = DeployerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ssh" => Ok(TargetType::Ssh),
            "gae" => Ok(TargetType::Gae),
            "aws" => Ok(TargetType::Aws),
            "for" => Ok(TargetType::For),
            _ => Err(incorrect_type(s)),
        }
    }
}

fn incorrect_type(input: &str) -> DeployerError {
    DeployerError::InvalidArgument(format!("Incorrect target settings type: {input}"))
}

/// Resolves a type reference: a canonical name, or anything `categories` knows.
///
/// # Errors
///
/// [`DeployerError::InvalidArgument`] when neither recognizes `input`.
pub fn resolve_target_type(
    input: &str,
    categories: &dyn CategoryResolver,
) -> Result<TargetType, DeployerError> {
    if let Ok(target_type) = input.parse::<TargetType>() {
        return Ok(target_type);
    }
    categories
        .ref_to_category(input)
        .ok_or_else(|| incorrect_type(input))
}

/// Splits the wire form of `ssh_host` into hosts.
///
/// An absent field yields a single empty host so forms always show one row.
pub fn decode_ssh_hosts(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => vec![String::new()],
        Some(Value::Array(hosts)) => hosts.iter().map(param_text).collect(),
        Some(other) => param_text(other).split(',').map(str::to_string).collect(),
    }
}

/// Joins hosts into the wire form of `ssh_host`.
///
/// No hosts means no field; one host is sent bare; several are comma-joined.
pub fn encode_ssh_hosts(hosts: &[String]) -> Option<Value> {
    match hosts {
        [] => None,
        [host] => Some(Value::String(host.clone())),
        hosts => Some(Value::String(hosts.join(","))),
    }
}

/// Settings of one deploy target for one target type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOptions {
    pub target_id: u64,
    pub target_type: TargetType,
    /// SSH hosts, in order.
    pub ssh_host: Vec<String>,
    /// Every other setting, keys normalized to underscores.
    #[serde(flatten)]
    pub fields: Params,
}

/// Changes to a target's settings.
#[derive(Debug, Clone, Default)]
pub struct TargetOptionsUpdate {
    pub target_id: u64,
    /// Type reference, resolved like [`resolve_target_type`].
    pub target_type: String,
    pub project_name: Option<String>,
    pub description: Option<String>,
    /// Replacement host list; `None` leaves hosts untouched.
    pub ssh_host: Option<Vec<String>>,
    /// Other settings to send as-is. An `ssh_host` entry here is treated like
    /// [`ssh_host`](Self::ssh_host) when that is `None`.
    pub fields: Params,
}

impl TargetOptionsUpdate {
    fn is_blank(&self) -> bool {
        self.ssh_host.is_none() && self.fields.is_empty()
    }
}

impl DeployerClient {
    /// Fetches the settings block of `target_type` for a target.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the API returns no data or no `hash` payload.
    ///
    /// # Errors
    ///
    /// [`DeployerError::InvalidArgument`] for an unresolvable type, before any request.
    pub async fn deploy_target_options(
        &self,
        target_id: u64,
        project_name: &str,
        target_type: &str,
    ) -> Result<Option<TargetOptions>, DeployerError> {
        let target_type = resolve_target_type(target_type, self.categories())?;

        let mut params = Params::new();
        params.insert("targetId".into(), target_id.into());
        params.insert("name".into(), target_type.option_name().into());
        params.insert("project_name".into(), project_name.into());

        let path = format!("org_deploy_target/{target_id}");
        let body = self.execute(Method::Get, &path, params, false).await?;
        let Some(hash) = HashEnvelope::<Params>::from_body(body) else {
            warn!(target_id, "target options response carried no hash");
            return Ok(None);
        };

        let mut fields: Params = hash
            .into_iter()
            .map(|(key, value)| (key.replace('-', "_"), value))
            .collect();
        let ssh_host = decode_ssh_hosts(fields.remove("ssh_host").as_ref());

        Ok(Some(TargetOptions {
            target_id,
            target_type,
            ssh_host,
            fields,
        }))
    }

    /// Writes a target's settings.
    ///
    /// # Returns
    ///
    /// `Ok(None)` without a request when the update carries no settings;
    /// otherwise the API's answer.
    ///
    /// # Errors
    ///
    /// [`DeployerError::InvalidArgument`] for an unresolvable type, or when more
    /// SSH hosts are given than the organization's limit allows. Both are raised
    /// before any request.
    pub async fn update_deploy_target_options(
        &self,
        update: TargetOptionsUpdate,
    ) -> Result<Option<Value>, DeployerError> {
        let target_type = resolve_target_type(&update.target_type, self.categories())?;
        if update.is_blank() {
            return Ok(None);
        }

        let TargetOptionsUpdate {
            target_id,
            project_name,
            description,
            ssh_host,
            fields: mut data,
            ..
        } = update;

        let field_hosts = match data.remove("ssh_host") {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_ssh_hosts(Some(&value))),
        };
        if let Some(hosts) = ssh_host.or(field_hosts) {
            if let Some(limit) = self.session().organization().limits.host_limit() {
                if hosts.len() > limit {
                    return Err(DeployerError::InvalidArgument(format!(
                        "Can save only {limit} hosts."
                    )));
                }
            }
            if let Some(encoded) = encode_ssh_hosts(&hosts) {
                data.insert("ssh_host".into(), encoded);
            }
        }

        data.insert("name".into(), target_type.option_name().into());
        data.insert("project_name".into(), project_name.into());
        data.insert("description".into(), description.into());

        let path = format!("org_deploy_target/{target_id}");
        self.execute(Method::Put, &path, data, false).await
    }
}
