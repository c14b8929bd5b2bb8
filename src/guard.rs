//! Deny-rule checks over split statements.

use crate::config::CompiledConfig;
use crate::decision::Decision;
use crate::script::Statement;

/// Check statements against the configured deny rules.
///
/// The first statement matching a rule rejects the whole script.
pub fn check_statements(statements: &[Statement], config: &CompiledConfig) -> Decision {
    for (index, statement) in statements.iter().enumerate() {
        let kind = statement.kind();
        for (rule, re) in &config.deny_patterns {
            if rule.kind.is_some_and(|k| k != kind) {
                continue;
            }
            if re.is_match(statement.text()) {
                return Decision::reject(&rule.pattern, &rule.reason, index);
            }
        }
    }

    Decision::accept()
}
