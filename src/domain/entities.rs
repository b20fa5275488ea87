//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Administrative level of a location.
///
/// Variants are declared in level order; `Ord` follows that order
/// (`Province < District < Sector < Cell < Village`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Province,
    District,
    Sector,
    Cell,
    Village,
}

impl LocationType {
    /// All levels, root first.
    pub const ALL: [LocationType; 5] = [
        LocationType::Province,
        LocationType::District,
        LocationType::Sector,
        LocationType::Cell,
        LocationType::Village,
    ];

    /// Position in the level order (Province = 0, Village = 4).
    pub fn ordinal(self) -> usize {
        match self {
            LocationType::Province => 0,
            LocationType::District => 1,
            LocationType::Sector => 2,
            LocationType::Cell => 3,
            LocationType::Village => 4,
        }
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// The level directly above, `None` for `Province`.
    pub fn parent_type(self) -> Option<Self> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    /// The level directly below, `None` for `Village`.
    pub fn child_type(self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    pub fn is_root(self) -> bool {
        self == LocationType::Province
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Province => "province",
            LocationType::District => "district",
            LocationType::Sector => "sector",
            LocationType::Cell => "cell",
            LocationType::Village => "village",
        }
    }

    /// Plural label, used to name a group of children of this level.
    pub fn plural(self) -> &'static str {
        match self {
            LocationType::Province => "provinces",
            LocationType::District => "districts",
            LocationType::Sector => "sectors",
            LocationType::Cell => "cells",
            LocationType::Village => "villages",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocationType::Province => "Province",
            LocationType::District => "District",
            LocationType::Sector => "Sector",
            LocationType::Cell => "Cell",
            LocationType::Village => "Village",
        };
        f.write_str(label)
    }
}

impl FromStr for LocationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::ParseLocationType(s.to_string()))
    }
}

/// Process-unique location identifier, assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Uuid);

impl LocationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LocationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// One administrative unit.
///
/// The parent is held by id and resolved through the store; a node never
/// owns its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: LocationId,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<LocationId>,
}

impl LocationNode {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        location_type: LocationType,
        parent_id: Option<LocationId>,
    ) -> Self {
        Self {
            id: LocationId::new(),
            code: code.into(),
            name: name.into(),
            location_type,
            parent_id,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for LocationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.code, self.location_type)
    }
}

/// Request to create a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default)]
    pub parent_code: Option<String>,
}

impl NewLocation {
    pub fn province(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            location_type: LocationType::Province,
            parent_code: None,
        }
    }

    pub fn child(
        name: impl Into<String>,
        code: impl Into<String>,
        location_type: LocationType,
        parent_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            location_type,
            parent_code: Some(parent_code.into()),
        }
    }

    /// Trim fields and check that `name` and `code` are present.
    ///
    /// A blank parent code is treated as absent.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let name = required("name", &self.name)?;
        let code = required("code", &self.code)?;
        if code.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidRequest(format!(
                "location code must not contain whitespace: {code:?}"
            )));
        }
        Ok(Self {
            name,
            code,
            location_type: self.location_type,
            parent_code: normalize_optional(self.parent_code),
        })
    }
}

/// Request to update a location.
///
/// Only `name` is mutable. The optional fields let a caller restate the
/// immutable ones; a value that differs from the stored one rejects the
/// whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, rename = "type")]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub parent_code: Option<String>,
}

impl LocationUpdate {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The parent code restated by the caller, if any.
    pub fn stated_parent_code(&self) -> Option<String> {
        normalize_optional(self.parent_code.clone())
    }

    /// Apply this update to `node`, whose parent currently has `parent_code`.
    ///
    /// Fails with `InvalidRequest` if the name is blank or a restated
    /// immutable field differs from the stored value.
    pub fn apply_to(
        &self,
        node: &LocationNode,
        parent_code: Option<&str>,
    ) -> Result<LocationNode, DomainError> {
        let name = required("name", &self.name)?;

        if let Some(code) = normalize_optional(self.code.clone()) {
            if code != node.code {
                return Err(DomainError::InvalidRequest(format!(
                    "location code is immutable: {} cannot become {}",
                    node.code, code
                )));
            }
        }
        if let Some(location_type) = self.location_type {
            if location_type != node.location_type {
                return Err(DomainError::InvalidRequest(format!(
                    "location type is immutable: {} cannot become {}",
                    node.location_type, location_type
                )));
            }
        }
        if let Some(stated) = self.stated_parent_code() {
            if Some(stated.as_str()) != parent_code {
                return Err(DomainError::InvalidRequest(format!(
                    "location parent is immutable: {} cannot be moved under {}",
                    node.code, stated
                )));
            }
        }

        Ok(LocationNode {
            name,
            ..node.clone()
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidRequest(format!(
            "location {field} must not be blank"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
