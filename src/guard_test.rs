use super::*;

const OTHER_PATHS: &[&str] = &["/", "/dashboard", "/login/", "/LOGIN", "/login?next=/", "", "not-a-path", "/settings/profile"];

fn redirect_to(location: &'static str) -> Decision {
    Decision::Redirect(GuardRedirect { location, status: StatusCode::FOUND })
}

// =============================================================================
// decision table
// =============================================================================

#[test]
fn logged_in_on_login_page_redirects_home() {
    assert_eq!(evaluate("/login", true), redirect_to("/"));
}

#[test]
fn logged_in_elsewhere_is_allowed() {
    for path in OTHER_PATHS {
        assert_eq!(evaluate(path, true), Decision::Allow, "path {path:?}");
    }
}

#[test]
fn logged_out_on_login_page_is_allowed() {
    assert_eq!(evaluate("/login", false), Decision::Allow);
}

#[test]
fn logged_out_elsewhere_redirects_to_login() {
    for path in OTHER_PATHS {
        assert_eq!(evaluate(path, false), redirect_to("/login"), "path {path:?}");
    }
}

#[test]
fn dashboard_scenarios() {
    assert_eq!(evaluate("/dashboard", true), Decision::Allow);
    assert_eq!(evaluate("/dashboard", false), redirect_to("/login"));
}

#[test]
fn evaluation_is_repeatable() {
    for path in OTHER_PATHS.iter().chain(std::iter::once(&"/login")) {
        for flag in [true, false] {
            assert_eq!(evaluate(path, flag), evaluate(path, flag));
        }
    }
}

#[test]
fn redirects_always_use_302() {
    for path in OTHER_PATHS.iter().chain(std::iter::once(&"/login")) {
        for flag in [true, false] {
            if let Decision::Redirect(redirect) = evaluate(path, flag) {
                assert_eq!(redirect.status, StatusCode::FOUND);
            }
        }
    }
}

// =============================================================================
// response conversion
// =============================================================================

#[test]
fn redirect_response_carries_location_header() {
    let Decision::Redirect(redirect) = evaluate("/dashboard", false) else {
        panic!("expected a redirect");
    };
    let response = redirect.into_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}
