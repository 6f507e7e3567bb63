use dimlab_policy::{MaskingPolicy, Role};
use proptest::prelude::*;

fn pii_value() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9@.\\-]{1,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn external_mask_is_all_asterisks_of_equal_length(v in pii_value()) {
        for policy in [
            MaskingPolicy::email(),
            MaskingPolicy::ssn(),
            MaskingPolicy::credit_card(),
        ] {
            let masked = policy.apply(Role::External, &v);
            prop_assert_eq!(masked.chars().count(), v.chars().count());
            prop_assert!(masked.chars().all(|c| c == '*'));
        }
    }

    #[test]
    fn admin_mask_is_identity(v in pii_value()) {
        for policy in [
            MaskingPolicy::email(),
            MaskingPolicy::ssn(),
            MaskingPolicy::credit_card(),
        ] {
            prop_assert_eq!(policy.apply(Role::Admin, &v), v.clone());
        }
    }

    #[test]
    fn analyst_ssn_mask_reveals_at_most_the_last_four_chars(v in pii_value()) {
        let masked = MaskingPolicy::ssn().apply(Role::Analyst, &v);
        let tail = masked.strip_prefix("***-**-").expect("fixed mask prefix");
        prop_assert!(tail.chars().count() <= 4);
        prop_assert!(v.ends_with(tail));
    }

    #[test]
    fn analyst_email_mask_never_reveals_the_local_part(v in pii_value()) {
        let masked = MaskingPolicy::email().apply(Role::Analyst, &v);
        match v.rfind('@') {
            // Domain survives, local part collapses to the fixed prefix.
            Some(idx) if idx >= 1 => {
                prop_assert_eq!(masked, format!("****@{}", &v[idx + 1..]));
            }
            // No local part to keep: full redaction.
            _ => prop_assert!(masked.chars().all(|c| c == '*')),
        }
    }
}
