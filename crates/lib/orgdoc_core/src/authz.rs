//! Document authorization engine.
//!
//! Pure decision functions over fully resolved user, role and document
//! snapshots. Nothing here touches the database; callers load the rows
//! and the listing queries in [`crate::documents`] encode the same
//! rules in SQL.
//!
//! Scoping is flat by policy: a `division`-scoped document is visible
//! only to users whose division matches exactly. Being placed in the
//! parent department, or in a unit under that division, grants nothing.

use uuid::Uuid;

use crate::models::document::{DocumentRow, PrivacyScope};
use crate::models::role::RoleRow;
use crate::models::user::UserRow;

/// Document actions gated by role capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
    Upload,
    Delete,
}

/// Whether `user` may see `document`, by privacy scope.
pub fn can_view(user: &UserRow, document: &DocumentRow) -> bool {
    match document.privacy_scope {
        PrivacyScope::Public => true,
        PrivacyScope::Department => {
            placement_matches(user.department_id, document.department_id)
        }
        PrivacyScope::Division => placement_matches(user.division_id, document.division_id),
        PrivacyScope::Unit => placement_matches(user.unit_id, document.unit_id),
    }
}

/// Whether `role` grants `action`. Capability flags are independent of
/// visibility; paths where both matter check [`can_view`] as well.
pub fn can_perform(role: &RoleRow, action: DocumentAction) -> bool {
    match action {
        DocumentAction::Upload => role.can_upload_document,
        DocumentAction::Delete => role.can_delete_document,
    }
}

/// Exact match only; a missing placement on either side never matches.
fn placement_matches(user_node: Option<Uuid>, document_node: Option<Uuid>) -> bool {
    match (user_node, document_node) {
        (Some(u), Some(d)) => u == d,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_placed(
        department_id: Option<Uuid>,
        division_id: Option<Uuid>,
        unit_id: Option<Uuid>,
    ) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "$2b$10$fake".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role_id: Uuid::new_v4(),
            department_id,
            division_id,
            unit_id,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn document_scoped(
        scope: PrivacyScope,
        department_id: Option<Uuid>,
        division_id: Option<Uuid>,
        unit_id: Option<Uuid>,
    ) -> DocumentRow {
        DocumentRow {
            id: Uuid::new_v4(),
            title: "Quarterly report".to_string(),
            description: None,
            file_path: "/files/report.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 1024,
            uploaded_at: Utc::now(),
            creator_id: Uuid::new_v4(),
            privacy_scope: scope,
            department_id,
            division_id,
            unit_id,
            version_number: 1,
            is_active: true,
        }
    }

    fn role_with(upload: bool, delete: bool) -> RoleRow {
        RoleRow {
            id: Uuid::new_v4(),
            name: "clerk".to_string(),
            description: None,
            can_upload_document: upload,
            can_delete_document: delete,
        }
    }

    #[test]
    fn public_documents_are_visible_to_everyone() {
        let doc = document_scoped(PrivacyScope::Public, None, None, None);
        assert!(can_view(&user_placed(None, None, None), &doc));
        assert!(can_view(
            &user_placed(Some(Uuid::new_v4()), Some(Uuid::new_v4()), None),
            &doc
        ));
    }

    #[test]
    fn department_scope_requires_exact_department() {
        let dept = Uuid::new_v4();
        let doc = document_scoped(PrivacyScope::Department, Some(dept), None, None);
        assert!(can_view(&user_placed(Some(dept), None, None), &doc));
        assert!(!can_view(
            &user_placed(Some(Uuid::new_v4()), None, None),
            &doc
        ));
        assert!(!can_view(&user_placed(None, None, None), &doc));
    }

    #[test]
    fn division_scope_requires_exact_division() {
        let division = Uuid::new_v4();
        let doc = document_scoped(PrivacyScope::Division, None, Some(division), None);
        assert!(can_view(&user_placed(None, Some(division), None), &doc));
        assert!(!can_view(
            &user_placed(None, Some(Uuid::new_v4()), None),
            &doc
        ));
        assert!(!can_view(&user_placed(None, None, None), &doc));
    }

    #[test]
    fn division_scope_ignores_department_and_unit_overlap() {
        let dept = Uuid::new_v4();
        let unit = Uuid::new_v4();
        let doc = document_scoped(
            PrivacyScope::Division,
            Some(dept),
            Some(Uuid::new_v4()),
            Some(unit),
        );
        // Same department, same unit, different division: still hidden.
        let near_miss = user_placed(Some(dept), Some(Uuid::new_v4()), Some(unit));
        assert!(!can_view(&near_miss, &doc));
        // Different department but matching division: visible.
        let cross_department = user_placed(Some(Uuid::new_v4()), doc.division_id, None);
        assert!(can_view(&cross_department, &doc));
    }

    #[test]
    fn unit_scope_requires_exact_unit() {
        let unit = Uuid::new_v4();
        let doc = document_scoped(PrivacyScope::Unit, None, None, Some(unit));
        assert!(can_view(&user_placed(None, None, Some(unit)), &doc));
        assert!(!can_view(&user_placed(None, None, Some(Uuid::new_v4())), &doc));
        assert!(!can_view(&user_placed(None, None, None), &doc));
    }

    #[test]
    fn department_placement_grants_nothing_on_child_scopes() {
        let dept = Uuid::new_v4();
        let user = user_placed(Some(dept), None, None);
        let division_doc = document_scoped(
            PrivacyScope::Division,
            Some(dept),
            Some(Uuid::new_v4()),
            None,
        );
        let unit_doc = document_scoped(
            PrivacyScope::Unit,
            Some(dept),
            None,
            Some(Uuid::new_v4()),
        );
        assert!(!can_view(&user, &division_doc));
        assert!(!can_view(&user, &unit_doc));
    }

    #[test]
    fn scoped_document_with_no_placement_is_invisible() {
        // A division-scoped document whose division reference is absent
        // matches no viewer at all.
        let doc = document_scoped(PrivacyScope::Division, None, None, None);
        assert!(!can_view(&user_placed(None, Some(Uuid::new_v4()), None), &doc));
        assert!(!can_view(&user_placed(None, None, None), &doc));
    }

    #[test]
    fn capability_flags_gate_actions_independently() {
        let uploader = role_with(true, false);
        let deleter = role_with(false, true);
        assert!(can_perform(&uploader, DocumentAction::Upload));
        assert!(!can_perform(&uploader, DocumentAction::Delete));
        assert!(!can_perform(&deleter, DocumentAction::Upload));
        assert!(can_perform(&deleter, DocumentAction::Delete));
    }

    #[test]
    fn delete_capability_does_not_imply_visibility() {
        let role = role_with(false, true);
        let doc = document_scoped(PrivacyScope::Unit, None, None, Some(Uuid::new_v4()));
        let user = user_placed(None, None, None);
        assert!(can_perform(&role, DocumentAction::Delete));
        assert!(!can_view(&user, &doc));
    }
}
