use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use portalguard_core::AppError;
use serde::{Deserialize, Serialize};

/// Profiles a portal user can act under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Reserved super-user role. Never present in the role table.
    Admin,
    /// Leads the content team and owns the calendar.
    ContentDirector,
    /// Runs social channels and publishes content.
    SocialMediaManager,
    /// Owns HR records and time off.
    HrManager,
    /// Owns the sales pipeline and CRM.
    SalesManager,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ContentDirector => "content_director",
            Self::SocialMediaManager => "social_media_manager",
            Self::HrManager => "hr_manager",
            Self::SalesManager => "sales_manager",
        }
    }

    /// Returns all known roles, including the reserved super-user role.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Admin,
            Role::ContentDirector,
            Role::SocialMediaManager,
            Role::HrManager,
            Role::SalesManager,
        ];

        ALL
    }

    /// Returns whether this is the reserved super-user role.
    #[must_use]
    pub fn is_super_user(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role value '{value}'")))
    }
}

/// Boolean capability keys carried by every role bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleCapability {
    /// Manage team membership.
    #[serde(rename = "canManageTeam")]
    CanManageTeam,
    /// Read HR records.
    #[serde(rename = "canViewHRData")]
    CanViewHrData,
    /// Modify HR records.
    #[serde(rename = "canEditHRData")]
    CanEditHrData,
    /// Approve time off.
    #[serde(rename = "canApproveTimeOff")]
    CanApproveTimeOff,
    /// Manage client accounts.
    #[serde(rename = "canManageClients")]
    CanManageClients,
    /// View analytics.
    #[serde(rename = "canViewAnalytics")]
    CanViewAnalytics,
    /// Edit the content calendar.
    #[serde(rename = "canManageContent")]
    CanManageContent,
    /// Approve content.
    #[serde(rename = "canApproveContent")]
    CanApproveContent,
    /// Publish content.
    #[serde(rename = "canPublishContent")]
    CanPublishContent,
    /// Manage social accounts.
    #[serde(rename = "canManageSocialAccounts")]
    CanManageSocialAccounts,
    /// Manage CRM records.
    #[serde(rename = "canManageCRM")]
    CanManageCrm,
    /// View the sales pipeline.
    #[serde(rename = "canViewSalesPipeline")]
    CanViewSalesPipeline,
    /// Manage support tickets.
    #[serde(rename = "canManageTickets")]
    CanManageTickets,
    /// Export data.
    #[serde(rename = "canExportData")]
    CanExportData,
    /// View revenue and billing figures. Role-only, no granular permission.
    #[serde(rename = "canViewFinancials")]
    CanViewFinancials,
    /// Open the admin panel. Role-only, no granular permission.
    #[serde(rename = "canAccessAdminPanel")]
    CanAccessAdminPanel,
}

impl RoleCapability {
    /// Returns the key used in role bundles and legacy boolean checks.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CanManageTeam => "canManageTeam",
            Self::CanViewHrData => "canViewHRData",
            Self::CanEditHrData => "canEditHRData",
            Self::CanApproveTimeOff => "canApproveTimeOff",
            Self::CanManageClients => "canManageClients",
            Self::CanViewAnalytics => "canViewAnalytics",
            Self::CanManageContent => "canManageContent",
            Self::CanApproveContent => "canApproveContent",
            Self::CanPublishContent => "canPublishContent",
            Self::CanManageSocialAccounts => "canManageSocialAccounts",
            Self::CanManageCrm => "canManageCRM",
            Self::CanViewSalesPipeline => "canViewSalesPipeline",
            Self::CanManageTickets => "canManageTickets",
            Self::CanExportData => "canExportData",
            Self::CanViewFinancials => "canViewFinancials",
            Self::CanAccessAdminPanel => "canAccessAdminPanel",
        }
    }

    /// Returns all capability keys.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleCapability] = &[
            RoleCapability::CanManageTeam,
            RoleCapability::CanViewHrData,
            RoleCapability::CanEditHrData,
            RoleCapability::CanApproveTimeOff,
            RoleCapability::CanManageClients,
            RoleCapability::CanViewAnalytics,
            RoleCapability::CanManageContent,
            RoleCapability::CanApproveContent,
            RoleCapability::CanPublishContent,
            RoleCapability::CanManageSocialAccounts,
            RoleCapability::CanManageCrm,
            RoleCapability::CanViewSalesPipeline,
            RoleCapability::CanManageTickets,
            RoleCapability::CanExportData,
            RoleCapability::CanViewFinancials,
            RoleCapability::CanAccessAdminPanel,
        ];

        ALL
    }
}

impl Display for RoleCapability {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for RoleCapability {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|capability| capability.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role capability '{value}'")))
    }
}

/// Capability flag bundle of one role. Keys not set read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCapabilities(BTreeMap<RoleCapability, bool>);

impl RoleCapabilities {
    /// Creates a bundle where exactly the listed capabilities are granted.
    #[must_use]
    pub fn granting(capabilities: &[RoleCapability]) -> Self {
        Self(
            RoleCapability::all()
                .iter()
                .map(|capability| (*capability, capabilities.contains(capability)))
                .collect(),
        )
    }

    /// Returns the flag for a capability.
    #[must_use]
    pub fn allows(&self, capability: RoleCapability) -> bool {
        self.0.get(&capability).copied().unwrap_or(false)
    }

    /// Returns every capability key with its flag, filling unset keys with `false`.
    #[must_use]
    pub fn flags(&self) -> BTreeMap<RoleCapability, bool> {
        RoleCapability::all()
            .iter()
            .map(|capability| (*capability, self.allows(*capability)))
            .collect()
    }

    /// Returns the granted capabilities.
    pub fn granted(&self) -> impl Iterator<Item = RoleCapability> + '_ {
        self.0
            .iter()
            .filter(|(_, allowed)| **allowed)
            .map(|(capability, _)| *capability)
    }
}

/// Presentation metadata of a role. Never consulted by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDisplay {
    /// Human-readable role name.
    pub name: String,
    /// Badge color as a hex string.
    pub color: String,
    /// Icon identifier.
    pub icon: String,
    /// Feature labels listed on the role card.
    #[serde(default)]
    pub features: Vec<String>,
}

/// One role table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Presentation metadata.
    pub display: RoleDisplay,
    /// Default capability flags.
    #[serde(default)]
    pub capabilities: RoleCapabilities,
}

/// Maps each non-admin role to its capability bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTable(BTreeMap<Role, RoleDefinition>);

impl RoleTable {
    /// Creates a role table from explicit definitions.
    #[must_use]
    pub fn new(definitions: BTreeMap<Role, RoleDefinition>) -> Self {
        Self(definitions)
    }

    /// Returns the definition for a role.
    ///
    /// The super-user role never resolves to a definition, even if one was
    /// configured.
    #[must_use]
    pub fn get(&self, role: Role) -> Option<&RoleDefinition> {
        if role.is_super_user() {
            return None;
        }

        self.0.get(&role)
    }

    /// Returns whether the raw table carries an entry for the super-user role.
    #[must_use]
    pub fn contains_super_user_entry(&self) -> bool {
        self.0.keys().any(Role::is_super_user)
    }

    /// Iterates over the configured roles and their definitions.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &RoleDefinition)> {
        self.0
            .iter()
            .filter(|(role, _)| !role.is_super_user())
            .map(|(role, definition)| (*role, definition))
    }

    /// Returns the role table shipped with the portal.
    #[must_use]
    pub fn builtin() -> Self {
        use RoleCapability::*;

        let definition = |name: &str,
                          color: &str,
                          icon: &str,
                          features: &[&str],
                          capabilities: &[RoleCapability]| RoleDefinition {
            display: RoleDisplay {
                name: name.to_owned(),
                color: color.to_owned(),
                icon: icon.to_owned(),
                features: features.iter().map(|value| (*value).to_owned()).collect(),
            },
            capabilities: RoleCapabilities::granting(capabilities),
        };

        Self(BTreeMap::from([
            (
                Role::ContentDirector,
                definition(
                    "Content Director",
                    "#7c3aed",
                    "pen-tool",
                    &[
                        "Content calendar",
                        "Content approval",
                        "Client management",
                        "Team oversight",
                        "Support tickets",
                    ],
                    &[
                        CanManageTeam,
                        CanApproveTimeOff,
                        CanManageClients,
                        CanViewAnalytics,
                        CanManageContent,
                        CanApproveContent,
                        CanPublishContent,
                        CanManageSocialAccounts,
                        CanManageTickets,
                        CanExportData,
                    ],
                ),
            ),
            (
                Role::SocialMediaManager,
                definition(
                    "Social Media Manager",
                    "#ec4899",
                    "share-2",
                    &["Content calendar", "Publishing", "Social accounts", "Analytics"],
                    &[
                        CanViewAnalytics,
                        CanManageContent,
                        CanPublishContent,
                        CanManageSocialAccounts,
                    ],
                ),
            ),
            (
                Role::HrManager,
                definition(
                    "HR Manager",
                    "#059669",
                    "users",
                    &["HR records", "Time off", "Team management", "Reports"],
                    &[
                        CanManageTeam,
                        CanViewHrData,
                        CanEditHrData,
                        CanApproveTimeOff,
                        CanViewAnalytics,
                        CanExportData,
                    ],
                ),
            ),
            (
                Role::SalesManager,
                definition(
                    "Sales Manager",
                    "#2563eb",
                    "trending-up",
                    &["CRM", "Sales pipeline", "Client management", "Financials"],
                    &[
                        CanManageClients,
                        CanViewAnalytics,
                        CanManageCrm,
                        CanViewSalesPipeline,
                        CanExportData,
                        CanViewFinancials,
                    ],
                ),
            ),
        ]))
    }
}
