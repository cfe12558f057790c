//! End-to-end routing tests over a realistic command registry
//!
//! The registry mixes textual grammars with one explicit-fragment grammar
//! (alternations like `[+-]path` are not expressible in the textual
//! syntax). Handlers return their name plus the match so each case can
//! assert on the extracted values.

use tokroute::{NamedValue, RouteError, RouteMatch, Router};

type Outcome = (&'static str, RouteMatch);

fn build_router() -> Router<(), Outcome> {
    let mut router: Router<(), Outcome> = Router::new();
    router
        .register(
            "settings (set|get|delete) jira.project:<jira_project>",
            |m, _| ("f_settings", m),
        )
        .unwrap()
        .register(
            "<rid> create-jira [<option(summary|project)>:<value>]+",
            |m, _| ("f_create_jira", m),
        )
        .unwrap()
        .register("jira <jira_id> set <option>:<value>", |m, _| {
            ("f_jira_set", m)
        })
        .unwrap()
        .register("list [<options>:<value>]*", |m, _| ("f_list", m))
        .unwrap()
        .register_fragments(
            &[
                ("(subscribe)", ""),
                ("(?P<feature>reviews|pushes|checks)", ""),
                (
                    r"(?P<filter_name>[+-]path|[+-]fork|[+-]branch|[+-]reviewer):(?P<filter_value>[^:]+)",
                    "+",
                ),
            ],
            |m, _| ("f_subscribe", m),
        )
        .unwrap()
        .register(
            "unsubscribe <feature> [<filter_name>:<filter_value>]+",
            |m, _| ("f_unsubscribe", m),
        )
        .unwrap();
    router
}

fn route(command: &str) -> Result<Outcome, RouteError> {
    build_router().route_to(command, &mut ())
}

#[test]
fn settings_command() {
    let (name, m) = route("settings set jira.project:TEST-PROJ").unwrap();
    assert_eq!(name, "f_settings");
    assert_eq!(m.named_str("jira_project"), Some("TEST-PROJ"));
    assert_eq!(m.sub_match(1).unwrap().text, "set");
}

#[test]
fn settings_with_unknown_verb_fails() {
    assert!(matches!(
        route("settings help jira.project:TEST-PROJ"),
        Err(RouteError::NoMatch { .. })
    ));
}

#[test]
fn create_jira_with_quoted_value() {
    let (name, m) = route(r#"123 create-jira summary:"jira title" project:NOWHERE"#).unwrap();
    assert_eq!(name, "f_create_jira");
    assert_eq!(m.named_str("rid"), Some("123"));
    assert_eq!(m.named_all("option"), vec!["summary", "project"]);
    assert_eq!(m.named_all("value"), vec!["jira title", "NOWHERE"]);
    assert_eq!(m.option_values("summary"), vec!["jira title"]);
    assert_eq!(m.option_values("project"), vec!["NOWHERE"]);
}

#[test]
fn create_jira_with_unknown_option_fails() {
    assert!(matches!(
        route("123 create-jira not-a-name:not-a-value"),
        Err(RouteError::NoMatch { .. })
    ));
}

#[test]
fn jira_set_command() {
    let (name, m) = route("jira none-123 set jira.board:tools").unwrap();
    assert_eq!(name, "f_jira_set");
    assert_eq!(m.named_str("jira_id"), Some("none-123"));
    assert_eq!(m.named_str("option"), Some("jira.board"));
    assert_eq!(m.named_str("value"), Some("tools"));
    assert_eq!(m.texts(), vec!["jira", "none-123", "set", "jira.board:tools"]);
}

#[test]
fn list_with_repeated_options() {
    let (name, m) =
        route("list author:abc statusCode:BEACHED statusCode:FAILED statusCode:PAUSED").unwrap();
    assert_eq!(name, "f_list");
    assert_eq!(
        m.named_all("options"),
        vec!["author", "statusCode", "statusCode", "statusCode"]
    );
    assert_eq!(
        m.named_all("value"),
        vec!["abc", "BEACHED", "FAILED", "PAUSED"]
    );
    assert_eq!(m.option_values("author"), vec!["abc"]);
    assert_eq!(
        m.option_values("statusCode"),
        vec!["BEACHED", "FAILED", "PAUSED"]
    );
    assert_eq!(m.option_keys(), vec!["author", "statusCode"]);
}

#[test]
fn list_with_no_options_still_concludes() {
    let (name, m) = route("list").unwrap();
    assert_eq!(name, "f_list");
    assert_eq!(m.named("options"), Some(&NamedValue::Many(vec![])));
}

#[test]
fn subscribe_via_explicit_fragments() {
    let (name, m) =
        route("subscribe reviews +path:ts/sdlc/* -fork:main/sdlc +path:ts/vats/*").unwrap();
    assert_eq!(name, "f_subscribe");
    assert_eq!(m.named_str("feature"), Some("reviews"));
    assert_eq!(m.named_all("filter_name"), vec!["+path", "-fork", "+path"]);
    assert_eq!(
        m.named_all("filter_value"),
        vec!["ts/sdlc/*", "main/sdlc", "ts/vats/*"]
    );
    // dynamic lookup by matched key text
    assert_eq!(m.option_values("+path"), vec!["ts/sdlc/*", "ts/vats/*"]);
    assert_eq!(m.option_values("-fork"), vec!["main/sdlc"]);
    // positional record: key and value are the occurrence's two groups
    let sub = m.sub_match(2).unwrap();
    assert_eq!(sub.groups[0].as_deref(), Some("+path"));
    assert_eq!(sub.groups[1].as_deref(), Some("ts/sdlc/*"));
}

#[test]
fn subscribe_without_filters_fails() {
    // the filter element is one-or-more
    assert!(matches!(
        route("subscribe reviews"),
        Err(RouteError::NoMatch { .. })
    ));
}

#[test]
fn unsubscribe_textual_equivalent() {
    let (name, m) = route("unsubscribe checks +branch:main -reviewer:bot").unwrap();
    assert_eq!(name, "f_unsubscribe");
    assert_eq!(m.named_str("feature"), Some("checks"));
    assert_eq!(m.named_all("filter_name"), vec!["+branch", "-reviewer"]);
    assert_eq!(m.named_all("filter_value"), vec!["main", "bot"]);
}

#[test]
fn unknown_command_is_no_match() {
    let err = route("unknown command").unwrap_err();
    match err {
        RouteError::NoMatch {
            command,
            considered,
        } => {
            assert_eq!(command, "unknown command");
            assert_eq!(considered.len(), 6);
        }
        other => panic!("expected NoMatch, got {:?}", other),
    }
}

mod spec_scenarios {
    use super::*;
    use std::sync::Arc;
    use tokroute::{match_tokens, Grammar};

    #[test]
    fn hello_user() {
        let mut router: Router<(), RouteMatch> = Router::new();
        router.register("hello <user>", |m, _| m).unwrap();
        let m = router.route_to("hello world", &mut ()).unwrap();
        assert!(m.conclusion());
        assert_eq!(m.named_str("user"), Some("world"));
    }

    #[test]
    fn close_with_repeated_links() {
        let mut router: Router<(), RouteMatch> = Router::new();
        router
            .register("(close|open) [link:<link_url>]+", |m, _| m)
            .unwrap();
        let m = router
            .route_to("close link:https://example.com", &mut ())
            .unwrap();
        assert_eq!(m.sub_match(0).unwrap().text, "close");
        assert_eq!(m.named_all("link_url"), vec!["https://example.com"]);
    }

    #[test]
    fn subscribe_with_repeated_labels() {
        let mut router: Router<(), RouteMatch> = Router::new();
        router
            .register(
                "subscribe <user_repo> [<option(+label|commits|author)>:<value>]+",
                |m, _| m,
            )
            .unwrap();
        let m = router
            .route_to(
                r#"subscribe user/repo +label:"teams/designers" +label:"urgent""#,
                &mut (),
            )
            .unwrap();
        assert_eq!(m.named_str("user_repo"), Some("user/repo"));
        assert_eq!(m.named_all("value"), vec!["teams/designers", "urgent"]);
        assert_eq!(m.named_all("option"), vec!["+label", "+label"]);
    }

    #[test]
    fn settings_get_project() {
        let mut router: Router<(), RouteMatch> = Router::new();
        router
            .register("settings (set|get|delete) project:<jira_project>", |m, _| m)
            .unwrap();
        let m = router
            .route_to("settings get project:TEST-PROJ", &mut ())
            .unwrap();
        assert_eq!(m.named_str("jira_project"), Some("TEST-PROJ"));
    }

    #[test]
    fn no_registered_grammar_matches() {
        let mut router: Router = Router::new();
        router.register("hello <user>", |_, _| ()).unwrap();
        assert!(matches!(
            router.route_to("unknown command", &mut ()),
            Err(RouteError::NoMatch { .. })
        ));
    }

    #[test]
    fn first_match_wins_across_stacked_grammars() {
        let mut router: Router<(), &'static str> = Router::new();
        router
            .register("a+ b", |_, _| "G1")
            .unwrap()
            .register("a* c* b", |_, _| "G2")
            .unwrap();
        assert_eq!(router.route_to("a b", &mut ()).unwrap(), "G1");
    }

    #[test]
    fn matching_consumes_every_token_exactly_once() {
        let grammar = Arc::new(
            Grammar::compile("(close|open) [link:<link_url>]+").unwrap(),
        );
        let tokens: Vec<String> = ["close", "link:https://a", "link:https://b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let m = match_tokens(&grammar, &tokens);
        assert!(m.conclusion());
        assert_eq!(
            m.texts(),
            tokens.iter().map(String::as_str).collect::<Vec<_>>()
        );
    }
}
