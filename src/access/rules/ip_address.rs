use crate::access::{messages::AccessMessage, rule::AccessRule, subnet::address_in_subnet};
use crate::models::domain::Quiz;

/// Only lets requests from the configured subnets in.
pub struct IpAddressRule<'a> {
    quiz: &'a Quiz,
    remote_addr: &'a str,
}

impl<'a> IpAddressRule<'a> {
    pub fn make(quiz: &'a Quiz, remote_addr: &'a str) -> Option<Self> {
        quiz.has_subnet().then_some(Self { quiz, remote_addr })
    }
}

impl AccessRule for IpAddressRule<'_> {
    fn name(&self) -> &'static str {
        "ipaddress"
    }

    fn prevent_access(&self) -> Option<AccessMessage> {
        if address_in_subnet(self.remote_addr, &self.quiz.subnet) {
            None
        } else {
            Some(AccessMessage::SubnetWrong)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::test_quiz;

    #[test]
    fn not_applicable_without_subnet() {
        let quiz = test_quiz();
        assert!(IpAddressRule::make(&quiz, "10.0.0.1").is_none());
    }

    #[test]
    fn blocks_addresses_outside_subnet() {
        let mut quiz = test_quiz();
        quiz.subnet = "10.0.0.0/8, 192.168.1.1-10".to_string();

        let inside = IpAddressRule::make(&quiz, "10.20.30.40").unwrap();
        assert_eq!(inside.prevent_access(), None);

        let range = IpAddressRule::make(&quiz, "192.168.1.5").unwrap();
        assert_eq!(range.prevent_access(), None);

        let outside = IpAddressRule::make(&quiz, "172.16.0.1").unwrap();
        assert_eq!(outside.prevent_access(), Some(AccessMessage::SubnetWrong));

        let unknown = IpAddressRule::make(&quiz, "").unwrap();
        assert_eq!(unknown.prevent_access(), Some(AccessMessage::SubnetWrong));
    }

    #[test]
    fn repeated_calls_give_identical_results() {
        let mut quiz = test_quiz();
        quiz.subnet = "10.0.0.0/8".to_string();

        for addr in ["10.1.2.3", "172.16.0.1"] {
            let rule = IpAddressRule::make(&quiz, addr).unwrap();
            assert_eq!(rule.prevent_access(), rule.prevent_access());
            assert_eq!(rule.description(), rule.description());
        }
    }
}
