use miniapp_core::{
    AppViewModel, Job, UserIdentity, ViewState, HISTORY_EMPTY_MESSAGE, PRODUCTS,
};

use super::constants::*;

/// Renders the whole screen as lines of text, top to bottom.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        APP_TITLE.to_string(),
        format!("{USER_LABEL} {}", user_line(view.user.as_ref())),
        tab_bar(view.active_view),
    ];

    if view.busy {
        lines.push(BUSY_TEXT.to_string());
    }
    if let Some(err) = &view.auth_error {
        lines.push(format!("! {err}"));
    }
    lines.push(RULE.to_string());

    match view.active_view {
        ViewState::Generate => render_generate(view, &mut lines),
        ViewState::History => render_history(view, &mut lines),
        ViewState::Billing => render_billing(view, &mut lines),
    }
    lines
}

fn user_line(user: Option<&UserIdentity>) -> String {
    match user {
        Some(user) => {
            let name = user.display_name();
            if name.is_empty() {
                format!("[{}]", user.id)
            } else {
                format!("[{}] {}", user.id, name)
            }
        }
        None => format!("[{NO_USER_BADGE}]"),
    }
}

fn tab_bar(active: ViewState) -> String {
    ViewState::ALL
        .iter()
        .map(|view| {
            let label = tab_label(*view);
            if *view == active {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn tab_label(view: ViewState) -> &'static str {
    match view {
        ViewState::Generate => TAB_GENERATE,
        ViewState::History => TAB_HISTORY,
        ViewState::Billing => TAB_BILLING,
    }
}

fn render_generate(view: &AppViewModel, lines: &mut Vec<String>) {
    lines.push(GENERATE_HEADING.to_string());
    lines.push(format!("Prompt: {}", view.prompt));
    lines.push(format!(
        "(generate: {}, clear: {})",
        enabled_label(view.can_generate()),
        enabled_label(view.can_clear_output())
    ));
    if !view.output.is_empty() {
        lines.push(OUTPUT_HINT.to_string());
        lines.extend(view.output.lines().map(|line| format!("  {line}")));
    }
}

fn render_history(view: &AppViewModel, lines: &mut Vec<String>) {
    lines.push(HISTORY_HEADING.to_string());
    if let Some(err) = &view.history_error {
        lines.push(format!("! {err}"));
    }
    if view.shows_empty_history() {
        lines.push(HISTORY_EMPTY_MESSAGE.to_string());
        return;
    }
    for job in &view.jobs {
        lines.extend(format_job(job));
    }
}

fn format_job(job: &Job) -> Vec<String> {
    let mut out = vec![
        format!("#{} [{}] {}", job.id, job.status, job.created_at),
        format!("  Prompt: {}", job.prompt),
    ];
    if let Some(result) = job.result_text.as_deref().filter(|text| !text.is_empty()) {
        out.push("  Result:".to_string());
        out.extend(result.lines().map(|line| format!("    {line}")));
    }
    out
}

fn render_billing(view: &AppViewModel, lines: &mut Vec<String>) {
    lines.push(BILLING_HEADING.to_string());
    lines.push(BILLING_HINT.to_string());
    for product in PRODUCTS.iter() {
        lines.push(format!(
            "  buy {:<12} {} ({})",
            product.id,
            product.label,
            enabled_label(view.can_buy())
        ));
    }
    if let Some(err) = &view.billing_error {
        lines.push(format!("! {err}"));
    }
    lines.push(BILLING_FOOTER.to_string());
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use miniapp_core::{RequestState, SessionState, HISTORY_FAILED_MESSAGE};

    use super::*;

    fn signed_in_view(active_view: ViewState) -> AppViewModel {
        AppViewModel {
            session: SessionState::Authenticated,
            authenticated: true,
            active_view,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn header_shows_user_and_active_tab() {
        let view = AppViewModel {
            user: Some(UserIdentity {
                id: 42,
                username: Some("alice".into()),
                first_name: None,
            }),
            ..signed_in_view(ViewState::History)
        };
        let lines = render(&view);
        assert_eq!(lines[2], "User: [42] @alice");
        assert_eq!(lines[3], " Generate  [History]  Billing ");
    }

    #[test]
    fn missing_user_shows_badge_and_auth_error() {
        let view = AppViewModel {
            auth_error: Some("nope".into()),
            busy: true,
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[2], "User: [no data]");
        assert!(lines.contains(&BUSY_TEXT.to_string()));
        assert!(lines.contains(&"! nope".to_string()));
        assert!(lines.contains(&"(generate: disabled, clear: enabled)".to_string()));
    }

    #[test]
    fn empty_history_is_not_an_error() {
        let lines = render(&signed_in_view(ViewState::History));
        assert!(lines.contains(&HISTORY_EMPTY_MESSAGE.to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("! ")));
    }

    #[test]
    fn history_rows_include_result_and_server_timestamp() {
        let view = AppViewModel {
            history: RequestState::Succeeded,
            jobs: vec![Job {
                id: "j1".into(),
                status: "done".into(),
                prompt: "hello".into(),
                created_at: "2024-05-01T10:30:15.123456+00:00".into(),
                result_text: Some("line one\nline two".into()),
            }],
            ..signed_in_view(ViewState::History)
        };
        let lines = render(&view);
        let start = lines.iter().position(|l| l.starts_with("#j1")).unwrap();
        assert_eq!(
            &lines[start..],
            &[
                "#j1 [done] 2024-05-01T10:30:15.123456+00:00".to_string(),
                "  Prompt: hello".to_string(),
                "  Result:".to_string(),
                "    line one".to_string(),
                "    line two".to_string(),
            ]
        );
    }

    #[test]
    fn history_error_is_shown_with_previous_jobs() {
        let view = AppViewModel {
            history: RequestState::Failed,
            history_error: Some(HISTORY_FAILED_MESSAGE.into()),
            jobs: vec![Job {
                id: "j1".into(),
                status: "queued".into(),
                prompt: "hi".into(),
                created_at: "yesterday".into(),
                result_text: None,
            }],
            ..signed_in_view(ViewState::History)
        };
        let lines = render(&view);
        assert!(lines.contains(&format!("! {HISTORY_FAILED_MESSAGE}")));
        assert!(lines.contains(&"#j1 [queued] yesterday".to_string()));
    }

    #[test]
    fn generate_output_is_indented() {
        let view = AppViewModel {
            output: "{\n  \"job_id\": \"j1\"\n}".into(),
            ..signed_in_view(ViewState::Generate)
        };
        let lines = render(&view);
        assert!(lines.contains(&OUTPUT_HINT.to_string()));
        assert!(lines.contains(&"    \"job_id\": \"j1\"".to_string()));
    }

    #[test]
    fn billing_lists_products() {
        let lines = render(&signed_in_view(ViewState::Billing));
        assert!(lines
            .iter()
            .any(|line| line.contains("credits_100") && line.contains("enabled")));
        assert!(lines.iter().any(|line| line.contains("sub_month")));
    }
}
