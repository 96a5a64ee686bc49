// Unit tests for useradmin
// These tests work with the public API only

#[cfg(test)]
mod model_tests {
    use useradmin::model::{Field, NewUser, User, UserDraft};

    #[test]
    fn test_full_draft_becomes_new_user() {
        let draft = UserDraft::full("Jane Doe", "jane@x.com", "editor");
        assert!(draft.check().is_ok());
        assert_eq!(
            draft.into_new_user(),
            Some(NewUser { name: "Jane Doe".into(), email: "jane@x.com".into(), role: "editor".into() })
        );
    }

    #[test]
    fn test_partial_draft_validates_present_fields_only() {
        let draft = UserDraft { email: Some("bad".into()), ..Default::default() };
        let errs = draft.check().unwrap_err();
        assert_eq!(errs.keys().copied().collect::<Vec<_>>(), vec![Field::Email]);
        assert!(draft.into_new_user().is_none());
    }

    #[test]
    fn test_edit_draft_starts_from_user() {
        let user = User { id: 9, name: "Tobias Funke".into(), email: "tobias@reqres.in".into(), role: "admin".into() };
        let draft = UserDraft::from(&user);
        assert_eq!(User::from_draft(user.id, &draft), user);
    }
}

#[cfg(test)]
mod search_tests {
    use useradmin::model::User;
    use useradmin::search::filter_users;

    fn users() -> Vec<User> {
        ["Byron Fields", "George Edwards", "Rachel Howell"]
            .iter()
            .enumerate()
            .map(|(i, name)| User {
                id: i as u64 + 1,
                name: name.to_string(),
                email: format!("{}@reqres.in", name.to_lowercase().replace(' ', ".")),
                role: "user".into(),
            })
            .collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_over_name_and_email() {
        let all = users();
        assert_eq!(filter_users(&all, "").len(), 3);
        let by_name: Vec<u64> = filter_users(&all, "GEORGE").iter().map(|u| u.id).collect();
        assert_eq!(by_name, vec![2]);
        let by_email: Vec<u64> = filter_users(&all, "rachel.howell@").iter().map(|u| u.id).collect();
        assert_eq!(by_email, vec![3]);
        assert!(filter_users(&all, "zzz").is_empty());
    }
}

#[cfg(test)]
mod pagination_tests {
    use useradmin::ui::pagination::Pagination;

    #[test]
    fn test_single_page_has_no_neighbours() {
        let p = Pagination::new(1, 1);
        assert!(!p.has_previous());
        assert!(!p.has_next());
        assert_eq!(p.next(), None);
        assert_eq!(p.last(), Some(1));
    }
}

#[cfg(test)]
mod view_tests {
    use useradmin::app::view::ViewState;

    #[test]
    fn test_view_state_instances_are_independent() {
        let mut a = ViewState::new();
        let b = ViewState::new();
        a.set_current_page(3);
        a.set_search_query("jan");
        assert_eq!(b.current_page(), 1);
        assert_eq!(b.search_query(), "");
        a.set_current_page(0);
        assert_eq!(a.current_page(), 1);
    }
}
