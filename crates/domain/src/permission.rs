use std::fmt::{Display, Formatter};
use std::str::FromStr;

use portalguard_core::AppError;
use serde::{Deserialize, Serialize};

/// Atomic capabilities checked by portal gates and write paths.
///
/// The storage value of every variant is its snake_case name, which is also
/// the identifier persisted in user profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows creating, deactivating and deleting user accounts.
    ManageUsers,
    /// Allows editing any user's profile, not only one's own.
    EditAnyProfile,
    /// Allows listing every profile in the directory.
    ViewAllProfiles,
    /// Allows changing which roles a user may hold.
    AssignRoles,
    /// Allows reading HR records.
    ViewHrData,
    /// Allows modifying HR records.
    EditHrData,
    /// Allows approving or rejecting time-off requests.
    ApproveTimeOff,
    /// Allows running employee onboarding checklists.
    ManageOnboarding,
    /// Allows creating and editing client accounts.
    ManageClients,
    /// Allows assigning account managers to clients.
    AssignClientManagers,
    /// Allows editing the service packages sold to a client.
    EditClientPackages,
    /// Allows reading client details and contacts.
    ViewClientDetails,
    /// Allows editing the content calendar.
    ManageContentCalendar,
    /// Allows approving drafted content.
    ApproveContent,
    /// Allows publishing approved content.
    PublishContent,
    /// Allows connecting and configuring social accounts.
    ManageSocialAccounts,
    /// Allows editing CRM records.
    ManageCrm,
    /// Allows viewing the sales pipeline.
    ViewSalesPipeline,
    /// Allows creating and closing deals.
    ManageDeals,
    /// Allows triaging and resolving support tickets.
    ManageTickets,
    /// Allows reading every support ticket regardless of assignee.
    ViewAllTickets,
    /// Allows viewing dashboards and analytics.
    ViewAnalytics,
    /// Allows exporting data to spreadsheets.
    ExportData,
    /// Allows managing team membership and assignments.
    ManageTeam,
    /// Allows changing portal-wide settings.
    ManageSettings,
    /// Allows reading the audit log.
    ViewAuditLog,
}

/// Permissions implied by the superseded single `adminPermissions` flag.
///
/// Frozen: accounts migrated to feature permission lists never consult it.
pub const LEGACY_ADMIN_BUNDLE: &[Permission] = &[
    Permission::ApproveTimeOff,
    Permission::ViewAnalytics,
    Permission::ManageClients,
    Permission::AssignClientManagers,
    Permission::EditClientPackages,
];

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manage_users",
            Self::EditAnyProfile => "edit_any_profile",
            Self::ViewAllProfiles => "view_all_profiles",
            Self::AssignRoles => "assign_roles",
            Self::ViewHrData => "view_hr_data",
            Self::EditHrData => "edit_hr_data",
            Self::ApproveTimeOff => "approve_time_off",
            Self::ManageOnboarding => "manage_onboarding",
            Self::ManageClients => "manage_clients",
            Self::AssignClientManagers => "assign_client_managers",
            Self::EditClientPackages => "edit_client_packages",
            Self::ViewClientDetails => "view_client_details",
            Self::ManageContentCalendar => "manage_content_calendar",
            Self::ApproveContent => "approve_content",
            Self::PublishContent => "publish_content",
            Self::ManageSocialAccounts => "manage_social_accounts",
            Self::ManageCrm => "manage_crm",
            Self::ViewSalesPipeline => "view_sales_pipeline",
            Self::ManageDeals => "manage_deals",
            Self::ManageTickets => "manage_tickets",
            Self::ViewAllTickets => "view_all_tickets",
            Self::ViewAnalytics => "view_analytics",
            Self::ExportData => "export_data",
            Self::ManageTeam => "manage_team",
            Self::ManageSettings => "manage_settings",
            Self::ViewAuditLog => "view_audit_log",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ManageUsers,
            Permission::EditAnyProfile,
            Permission::ViewAllProfiles,
            Permission::AssignRoles,
            Permission::ViewHrData,
            Permission::EditHrData,
            Permission::ApproveTimeOff,
            Permission::ManageOnboarding,
            Permission::ManageClients,
            Permission::AssignClientManagers,
            Permission::EditClientPackages,
            Permission::ViewClientDetails,
            Permission::ManageContentCalendar,
            Permission::ApproveContent,
            Permission::PublishContent,
            Permission::ManageSocialAccounts,
            Permission::ManageCrm,
            Permission::ViewSalesPipeline,
            Permission::ManageDeals,
            Permission::ManageTickets,
            Permission::ViewAllTickets,
            Permission::ViewAnalytics,
            Permission::ExportData,
            Permission::ManageTeam,
            Permission::ManageSettings,
            Permission::ViewAuditLog,
        ];

        ALL
    }

    /// Returns the display category this permission is listed under.
    #[must_use]
    pub fn category(&self) -> PermissionCategory {
        match self {
            Self::ManageUsers | Self::EditAnyProfile | Self::ViewAllProfiles | Self::AssignRoles => {
                PermissionCategory::UserManagement
            }
            Self::ViewHrData | Self::EditHrData | Self::ApproveTimeOff | Self::ManageOnboarding => {
                PermissionCategory::HrFunctions
            }
            Self::ManageClients
            | Self::AssignClientManagers
            | Self::EditClientPackages
            | Self::ViewClientDetails => PermissionCategory::ClientManagement,
            Self::ManageContentCalendar
            | Self::ApproveContent
            | Self::PublishContent
            | Self::ManageSocialAccounts => PermissionCategory::ContentAndSocial,
            Self::ManageCrm | Self::ViewSalesPipeline | Self::ManageDeals => {
                PermissionCategory::SalesAndCrm
            }
            Self::ManageTickets | Self::ViewAllTickets => PermissionCategory::Support,
            Self::ViewAnalytics | Self::ExportData => PermissionCategory::AnalyticsAndReporting,
            Self::ManageTeam | Self::ManageSettings | Self::ViewAuditLog => {
                PermissionCategory::Administration
            }
        }
    }

    /// Returns whether this permission belongs to the legacy admin bundle.
    #[must_use]
    pub fn is_in_legacy_admin_bundle(&self) -> bool {
        LEGACY_ADMIN_BUNDLE.contains(self)
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

/// Display grouping of permissions. Has no effect on resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCategory {
    /// Accounts, profiles and role assignment.
    UserManagement,
    /// HR records and time off.
    HrFunctions,
    /// Client accounts and packages.
    ClientManagement,
    /// Content calendar and social channels.
    ContentAndSocial,
    /// CRM and sales pipeline.
    SalesAndCrm,
    /// Support tickets.
    Support,
    /// Dashboards and exports.
    AnalyticsAndReporting,
    /// Team and portal administration.
    Administration,
}

impl PermissionCategory {
    /// Returns all categories in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionCategory] = &[
            PermissionCategory::UserManagement,
            PermissionCategory::HrFunctions,
            PermissionCategory::ClientManagement,
            PermissionCategory::ContentAndSocial,
            PermissionCategory::SalesAndCrm,
            PermissionCategory::Support,
            PermissionCategory::AnalyticsAndReporting,
            PermissionCategory::Administration,
        ];

        ALL
    }

    /// Returns the heading shown in permission editors.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UserManagement => "User Management",
            Self::HrFunctions => "HR Functions",
            Self::ClientManagement => "Client Management",
            Self::ContentAndSocial => "Content & Social",
            Self::SalesAndCrm => "Sales & CRM",
            Self::Support => "Support",
            Self::AnalyticsAndReporting => "Analytics & Reporting",
            Self::Administration => "Administration",
        }
    }

    /// Returns the permissions listed under this category.
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|permission| permission.category() == *self)
            .collect()
    }
}
