//! Template registry
//!
//! Pages are handlebars templates compiled into the binary. The registry
//! is built once at startup and carried in the shared state like any
//! other injected handle. `_top`/`_bottom` are partials giving every page
//! the same shell and navigation.

use handlebars::Handlebars;

const TEMPLATES: &[(&str, &str)] = &[
    ("_top", include_str!("../templates/_top.hbs")),
    ("_bottom", include_str!("../templates/_bottom.hbs")),
    ("index", include_str!("../templates/index.hbs")),
    ("register", include_str!("../templates/register.hbs")),
    ("login", include_str!("../templates/login.hbs")),
    (
        "create_business",
        include_str!("../templates/create_business.hbs"),
    ),
    ("business", include_str!("../templates/business.hbs")),
    ("dashboard", include_str!("../templates/dashboard.hbs")),
];

/// Build the registry with every page template registered.
pub fn registry() -> Result<Handlebars<'static>, handlebars::TemplateError> {
    let mut registry = Handlebars::new();
    for (name, source) in TEMPLATES {
        registry.register_template_string(name, *source)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_templates_parse() {
        let registry = registry().unwrap();
        for (name, _) in TEMPLATES {
            assert!(
                registry.get_template(name).is_some(),
                "missing template {}",
                name
            );
        }
    }

    #[test]
    fn index_lists_businesses_and_owner_dashboard_link() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "index",
                &json!({
                    "title": "Businesses",
                    "current_user": "karla",
                    "current_user_id": 1,
                    "businesses": [
                        {"id": 7, "name": "Cafe Rio", "owner_id": 1, "owner_name": "karla", "review_count": 2},
                        {"id": 8, "name": "Print Shop", "owner_id": 2, "owner_name": "sam", "review_count": 1},
                    ],
                }),
            )
            .unwrap();

        assert!(html.contains("Cafe Rio"));
        assert!(html.contains("2 reviews"));
        // singular form for a single review
        assert!(!html.contains("1 reviews"));
        // Dashboard link only on the caller's own business
        assert!(html.contains("/dashboard/7"));
        assert!(!html.contains("/dashboard/8"));
    }

    #[test]
    fn index_empty_state() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "index",
                &json!({"title": "Businesses", "current_user": null, "current_user_id": null, "businesses": []}),
            )
            .unwrap();

        assert!(html.contains("Nothing here yet"));
        assert!(html.contains("/register"));
    }

    #[test]
    fn login_shows_error_and_keeps_username() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "login",
                &json!({"title": "Log in", "error": "Invalid username or password.", "username": "karla"}),
            )
            .unwrap();

        assert!(html.contains("Invalid username or password."));
        assert!(html.contains(r#"value="karla""#));
    }

    #[test]
    fn business_page_prefills_existing_review() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "business",
                &json!({
                    "title": "Cafe Rio",
                    "current_user": "karla",
                    "business": {"id": 3, "name": "Cafe Rio"},
                    "review_count": 1,
                    "reviews": [{
                        "author": "karla",
                        "rating_place": 8, "rating_price": 6,
                        "rating_installations": 9, "rating_service": 10,
                        "location_label": "Convenient",
                        "comment": "solid spot",
                        "updated_at": "2026-08-01",
                    }],
                    "my_review": {
                        "rating_place": 8, "rating_price": 6,
                        "rating_installations": 9, "rating_service": 10,
                        "location": "convenient",
                        "comment": "solid spot",
                    },
                    "rating_scale": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
                }),
            )
            .unwrap();

        assert!(html.contains("Update your review"));
        assert!(html.contains(r#"<option value="8" selected>8</option>"#));
        assert!(html.contains(r#"<option value="convenient" selected>"#));
        assert!(html.contains("solid spot"));
        assert!(html.contains(r#"action="/business/3""#));
    }

    #[test]
    fn business_page_without_session_offers_login() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "business",
                &json!({
                    "title": "Cafe Rio",
                    "current_user": null,
                    "business": {"id": 3, "name": "Cafe Rio"},
                    "review_count": 0,
                    "reviews": [],
                    "my_review": null,
                    "rating_scale": [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
                }),
            )
            .unwrap();

        assert!(html.contains("No reviews yet"));
        assert!(html.contains("to leave a review"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn dashboard_embeds_charts_when_reviews_exist() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "dashboard",
                &json!({
                    "title": "Dashboard",
                    "current_user": "karla",
                    "business": {"id": 5, "name": "Cafe Rio"},
                    "total_reviews": 4,
                    "has_reviews": true,
                    "categories": [
                        {"key": "place", "label": "Place"},
                        {"key": "price", "label": "Price"},
                        {"key": "installations", "label": "Installations"},
                        {"key": "service", "label": "Service"},
                    ],
                    "location_summary": [
                        {"label": "Convenient", "count": 3, "percentage": "75.0"},
                        {"label": "Not convenient", "count": 1, "percentage": "25.0"},
                    ],
                }),
            )
            .unwrap();

        assert!(html.contains("/dashboard/5/charts/place.svg"));
        assert!(html.contains("/dashboard/5/charts/service.svg"));
        assert!(html.contains("/dashboard/5/charts/location.svg"));
        assert!(html.contains("Convenient: 3 (75.0%)"));
    }

    #[test]
    fn dashboard_with_no_reviews_has_no_images() {
        let registry = registry().unwrap();
        let html = registry
            .render(
                "dashboard",
                &json!({
                    "title": "Dashboard",
                    "current_user": "karla",
                    "business": {"id": 5, "name": "Cafe Rio"},
                    "total_reviews": 0,
                    "has_reviews": false,
                    "categories": [],
                    "location_summary": [],
                }),
            )
            .unwrap();

        assert!(html.contains("Total reviews: 0"));
        assert!(html.contains("nothing to chart"));
        assert!(!html.contains("<img"));
    }
}
