//! Static registry of rating dimensions per reviewer/reviewee pairing.

use super::domain::Role;

pub type CriteriaSet = &'static [&'static str];

const TENANT_REVIEWING_AGENCY: CriteriaSet = &[
    "Communication",
    "Maintenance Responsiveness",
    "Transparency",
    "Professionalism",
];

const TENANT_REVIEWING_LANDLORD: CriteriaSet = &[
    "Communication",
    "Problem Resolution Speed",
    "Property Maintenance",
    "Flexibility",
];

const LANDLORD_REVIEWING_TENANT: CriteriaSet = &[
    "Payment Punctuality",
    "Property Care",
    "Communication",
    "Condominium Rule Compliance",
];

const LANDLORD_REVIEWING_AGENCY: CriteriaSet = &[
    "Communication",
    "Financial Transparency",
    "Tenant Quality",
    "Maintenance Management",
];

const AGENCY_REVIEWING_TENANT: CriteriaSet = &[
    "Payment Punctuality",
    "Property Care",
    "Communication",
    "Contract Compliance",
];

const AGENCY_REVIEWING_LANDLORD: CriteriaSet = &[
    "Communication",
    "Decision Speed",
    "Preventive Maintenance",
    "Trustworthiness",
];

const CONDOMINIUM: CriteriaSet = &[
    "Building Management",
    "Common Area Upkeep",
    "Security",
    "Fee Fairness",
];

/// Ordered criteria for a reviewer scoring a reviewee. Same-role pairs have none.
pub fn criteria_for(reviewer: Role, reviewee: Role) -> CriteriaSet {
    match (reviewer, reviewee) {
        (Role::Tenant, Role::Agency) => TENANT_REVIEWING_AGENCY,
        (Role::Tenant, Role::Landlord) => TENANT_REVIEWING_LANDLORD,
        (Role::Landlord, Role::Tenant) => LANDLORD_REVIEWING_TENANT,
        (Role::Landlord, Role::Agency) => LANDLORD_REVIEWING_AGENCY,
        (Role::Agency, Role::Tenant) => AGENCY_REVIEWING_TENANT,
        (Role::Agency, Role::Landlord) => AGENCY_REVIEWING_LANDLORD,
        _ => &[],
    }
}

pub fn condominium_criteria() -> CriteriaSet {
    CONDOMINIUM
}

/// The two roles a reviewer may review, in declaration order.
pub fn counterpart_roles(reviewer: Role) -> [Role; 2] {
    match reviewer {
        Role::Tenant => [Role::Landlord, Role::Agency],
        Role::Landlord => [Role::Tenant, Role::Agency],
        Role::Agency => [Role::Tenant, Role::Landlord],
    }
}

pub fn is_counterpart(reviewer: Role, reviewee: Role) -> bool {
    counterpart_roles(reviewer).contains(&reviewee)
}

/// Only tenants live in the building, so only they rate the condominium.
pub fn condominium_available(reviewer: Role) -> bool {
    reviewer == Role::Tenant
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_distinct_pair_has_four_criteria() {
        for reviewer in Role::ordered() {
            for reviewee in counterpart_roles(reviewer) {
                let criteria = criteria_for(reviewer, reviewee);
                assert_eq!(criteria.len(), 4, "{reviewer} -> {reviewee}");
            }
        }
    }

    #[test]
    fn same_role_pairs_have_no_criteria() {
        for role in Role::ordered() {
            assert!(criteria_for(role, role).is_empty());
            assert!(!is_counterpart(role, role));
        }
    }

    #[test]
    fn tenant_reviewing_landlord_keeps_documented_order() {
        assert_eq!(
            criteria_for(Role::Tenant, Role::Landlord),
            &[
                "Communication",
                "Problem Resolution Speed",
                "Property Maintenance",
                "Flexibility",
            ]
        );
    }

    #[test]
    fn condominium_criteria_are_role_independent() {
        assert_eq!(condominium_criteria().len(), 4);
        assert!(condominium_available(Role::Tenant));
        assert!(!condominium_available(Role::Landlord));
        assert!(!condominium_available(Role::Agency));
    }

    #[test]
    fn counterparts_exclude_the_reviewer() {
        assert_eq!(counterpart_roles(Role::Agency), [Role::Tenant, Role::Landlord]);
        for reviewer in Role::ordered() {
            assert!(!counterpart_roles(reviewer).contains(&reviewer));
        }
    }
}
