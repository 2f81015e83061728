use crate::history::chain::SkippedSnapshot;

fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn emit(code: &str, stage: &str, file: &str, reason: &str) {
    tracing::warn!(
        code = %sanitize_value(code),
        stage = %sanitize_value(stage),
        file = %sanitize_value(file),
        reason = %sanitize_value(reason),
        "snapshot skipped"
    );
}

pub fn skipped(stage: &str, skipped: &SkippedSnapshot) {
    emit(skipped.code, stage, &skipped.name, &skipped.reason);
}
