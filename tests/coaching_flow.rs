use std::sync::Arc;

use musecoach::catalog::content::starter_skills;
use musecoach::{
    CoachingResponse, EngineConfig, InMemorySessionStore, Muse, SafetyEngine, SessionCoordinator,
    SkillRegistry,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn coordinator() -> SessionCoordinator {
    let config = EngineConfig::default();
    let registry = Arc::new(
        SkillRegistry::with_skills(
            starter_skills(),
            config.learning.preference_alpha,
            config.scoring.default_preference,
        )
        .expect("starter catalog valid"),
    );
    SessionCoordinator::new(
        registry,
        SafetyEngine::with_default_rules(),
        Arc::new(InMemorySessionStore::new()),
        config,
    )
}

mod resistance_clamping {
    use super::*;

    #[test]
    fn stays_in_range_across_arbitrary_turn_sequences() {
        init_logging();
        let coordinator = coordinator();
        let turns = [
            "I can't, it's impossible, too hard",
            "still too tired and no time",
            "ready now, let's try",
            "this is not working at all",
            "feeling better, that worked",
        ];
        for _ in 0..10 {
            for turn in turns {
                coordinator.coach("clamp", turn, "dusk", None, None);
                let resistance = coordinator.session("clamp").unwrap().resistance;
                assert!((0.0..=1.0).contains(&resistance), "resistance {resistance} escaped");
            }
        }
    }

    #[test]
    fn stays_in_range_across_feedback_readings() {
        let coordinator = coordinator();
        coordinator.coach("clamp", "trouble sleeping", "evening", None, None);
        for extreme in [5.0, -3.0, 0.4, 99.0] {
            coordinator.feedback("clamp", "wind-down-dim", true, Some(extreme), None);
            let resistance = coordinator.session("clamp").unwrap().resistance;
            assert!((0.0..=1.0).contains(&resistance));
        }
    }
}

mod learning_loop {
    use super::*;

    #[test]
    fn accepts_raise_the_offered_muses_preference() {
        init_logging();
        let coordinator = coordinator();
        let response = coordinator.coach("s1", "trouble sleeping tonight", "evening", None, None);
        let muse = response.muse_used.expect("offer carries a muse");
        let before = coordinator.registry().muse_preferences()[&muse];

        coordinator.feedback("s1", &response.skill_offered.unwrap(), true, None, None);

        let after = coordinator.registry().muse_preferences()[&muse];
        assert!(after > before);
    }

    #[test]
    fn declines_lower_the_offered_muses_preference() {
        let coordinator = coordinator();
        let response = coordinator.coach("s1", "trouble sleeping tonight", "evening", None, None);
        let muse = response.muse_used.expect("offer carries a muse");
        let before = coordinator.registry().muse_preferences()[&muse];

        coordinator.feedback(
            "s1",
            &response.skill_offered.unwrap(),
            false,
            None,
            Some("not tonight"),
        );

        let after = coordinator.registry().muse_preferences()[&muse];
        assert!(after < before);
    }

    #[test]
    fn feedback_is_the_only_write_path() {
        let coordinator = coordinator();
        // coaching turns alone never create telemetry
        for _ in 0..5 {
            coordinator.coach("s1", "trouble sleeping", "evening", None, None);
        }
        assert_eq!(coordinator.registry().telemetry_len(), 0);

        coordinator.feedback("s1", "wind-down-dim", true, None, None);
        assert_eq!(coordinator.registry().telemetry_len(), 1);
    }

    #[test]
    fn duplicate_feedback_for_unknown_names_never_panics() {
        let coordinator = coordinator();
        coordinator.feedback("ghost-session", "wind-down-dim", true, None, None);
        coordinator.coach("s1", "hello", "morning", None, None);
        coordinator.feedback("s1", "ghost-skill", false, Some(0.4), None);
        coordinator.feedback("s1", "ghost-skill", false, Some(0.4), None);
        assert_eq!(coordinator.registry().telemetry_len(), 0);
    }
}

mod outward_contract {
    use super::*;

    #[test]
    fn escalation_turn_has_alert_and_no_offer() {
        let coordinator = coordinator();
        let response =
            coordinator.coach("s1", "I can't stop drinking lately", "evening", None, None);
        assert!(response.requires_escalation);
        assert!(response.safety_alert.is_some());
        assert!(response.skill_offered.is_none());
        assert!(response.muse_used.is_none());
        assert!(!response.follow_up_suggested);
        assert!(response.message.contains("SAMHSA"));
    }

    #[test]
    fn coaching_turn_offers_exactly_one_skill_with_follow_up() {
        let coordinator = coordinator();
        let response =
            coordinator.coach("s1", "so stiff from sitting all day", "morning", None, None);
        assert!(!response.requires_escalation);
        assert!(response.skill_offered.is_some());
        assert!(response.follow_up_suggested);
    }

    #[test]
    fn response_round_trips_through_json() {
        let coordinator = coordinator();
        let response = coordinator.coach("s1", "trouble sleeping", "evening", None, None);
        let json = serde_json::to_string(&response).unwrap();
        let back: CoachingResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.skill_offered, response.skill_offered);
        assert_eq!(back.requires_escalation, response.requires_escalation);
    }

    #[test]
    fn explicit_muse_preference_is_honored_at_low_resistance() {
        let coordinator = coordinator();
        coordinator.set_preferred_muse("s1", Muse::Playmate);
        // lowering phrase drops resistance to 0.4, well under the override cutoff
        let response =
            coordinator.coach("s1", "ready for better sleep", "evening", None, None);
        assert_eq!(response.muse_used, Some(Muse::Playmate));
    }
}
