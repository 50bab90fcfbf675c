//! Bidirectional mapping between role capability keys and permissions.
//!
//! Both directions are exhaustive matches so that a new [`Permission`] or
//! [`RoleCapability`] variant does not compile until it is placed in the
//! bridge, or explicitly left out of it.

use crate::{Permission, RoleCapability};

impl RoleCapability {
    /// Returns the granular permission this capability key stands for.
    #[must_use]
    pub fn permission(&self) -> Option<Permission> {
        match self {
            Self::CanManageTeam => Some(Permission::ManageTeam),
            Self::CanViewHrData => Some(Permission::ViewHrData),
            Self::CanEditHrData => Some(Permission::EditHrData),
            Self::CanApproveTimeOff => Some(Permission::ApproveTimeOff),
            Self::CanManageClients => Some(Permission::ManageClients),
            Self::CanViewAnalytics => Some(Permission::ViewAnalytics),
            Self::CanManageContent => Some(Permission::ManageContentCalendar),
            Self::CanApproveContent => Some(Permission::ApproveContent),
            Self::CanPublishContent => Some(Permission::PublishContent),
            Self::CanManageSocialAccounts => Some(Permission::ManageSocialAccounts),
            Self::CanManageCrm => Some(Permission::ManageCrm),
            Self::CanViewSalesPipeline => Some(Permission::ViewSalesPipeline),
            Self::CanManageTickets => Some(Permission::ManageTickets),
            Self::CanExportData => Some(Permission::ExportData),
            Self::CanViewFinancials | Self::CanAccessAdminPanel => None,
        }
    }
}

impl Permission {
    /// Returns the role capability key that grants this permission by default.
    #[must_use]
    pub fn role_capability(&self) -> Option<RoleCapability> {
        match self {
            Self::ManageTeam => Some(RoleCapability::CanManageTeam),
            Self::ViewHrData => Some(RoleCapability::CanViewHrData),
            Self::EditHrData => Some(RoleCapability::CanEditHrData),
            Self::ApproveTimeOff => Some(RoleCapability::CanApproveTimeOff),
            Self::ManageClients => Some(RoleCapability::CanManageClients),
            Self::ViewAnalytics => Some(RoleCapability::CanViewAnalytics),
            Self::ManageContentCalendar => Some(RoleCapability::CanManageContent),
            Self::ApproveContent => Some(RoleCapability::CanApproveContent),
            Self::PublishContent => Some(RoleCapability::CanPublishContent),
            Self::ManageSocialAccounts => Some(RoleCapability::CanManageSocialAccounts),
            Self::ManageCrm => Some(RoleCapability::CanManageCrm),
            Self::ViewSalesPipeline => Some(RoleCapability::CanViewSalesPipeline),
            Self::ManageTickets => Some(RoleCapability::CanManageTickets),
            Self::ExportData => Some(RoleCapability::CanExportData),
            Self::ManageUsers
            | Self::EditAnyProfile
            | Self::ViewAllProfiles
            | Self::AssignRoles
            | Self::ManageOnboarding
            | Self::AssignClientManagers
            | Self::EditClientPackages
            | Self::ViewClientDetails
            | Self::ManageDeals
            | Self::ViewAllTickets
            | Self::ManageSettings
            | Self::ViewAuditLog => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{Permission, RoleCapability};

    #[test]
    fn bridge_directions_agree() {
        for capability in RoleCapability::all() {
            if let Some(permission) = capability.permission() {
                assert_eq!(permission.role_capability(), Some(*capability));
            }
        }

        for permission in Permission::all() {
            if let Some(capability) = permission.role_capability() {
                assert_eq!(capability.permission(), Some(*permission));
            }
        }
    }

    #[test]
    fn bridge_is_injective_in_both_directions() {
        let bridged_permissions: Vec<Permission> = RoleCapability::all()
            .iter()
            .filter_map(RoleCapability::permission)
            .collect();
        let unique_permissions: BTreeSet<Permission> =
            bridged_permissions.iter().copied().collect();
        assert_eq!(bridged_permissions.len(), unique_permissions.len());

        let bridged_capabilities: Vec<RoleCapability> = Permission::all()
            .iter()
            .filter_map(Permission::role_capability)
            .collect();
        let unique_capabilities: BTreeSet<RoleCapability> =
            bridged_capabilities.iter().copied().collect();
        assert_eq!(bridged_capabilities.len(), unique_capabilities.len());
    }

    #[test]
    fn bridge_is_partial() {
        assert_eq!(RoleCapability::CanViewFinancials.permission(), None);
        assert_eq!(Permission::ManageUsers.role_capability(), None);
        assert_eq!(
            RoleCapability::CanViewHrData.permission(),
            Some(Permission::ViewHrData)
        );
    }
}
