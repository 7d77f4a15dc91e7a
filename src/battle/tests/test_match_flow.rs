#[cfg(test)]
mod tests {
    use crate::battle::runner::BattleRunner;
    use crate::battle::state::{BattleEvent, Side, TurnRng};
    use crate::battle::tests::common::{
        create_test_match, create_test_runner, predictable_rng, resume_runner, TestMatchBuilder,
    };
    use crate::config::{BattleRules, GameMode, MatchConfig};
    use crate::errors::{ActionError, BattleEngineError, ConfigurationError};
    use crate::roster::builtin_roster;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_vs_computer_alternates_with_the_ai() {
        let mut runner = create_test_runner(GameMode::VsComputer, "pikachu", "charmander");
        assert!(runner.is_awaiting_human());
        assert_eq!(runner.next_action_delay(), Duration::ZERO);

        runner
            .submit_move_with_rng(Side::Player, 0, TurnRng::new_for_test(vec![50, 50, 50]))
            .unwrap();
        assert!(!runner.is_awaiting_human());
        assert_eq!(runner.next_action_delay(), Duration::from_millis(1500));

        // AI pick among flame burst, scratch and bite, then hit, no crit, weather stays.
        let result = runner
            .run_ai_turn_with_rng(TurnRng::new_for_test(vec![1, 50, 50, 50]))
            .unwrap();

        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.attacker, Side::Opponent);
        assert_eq!(outcome.move_name, "flame burst");
        assert_eq!(runner.state().combatant(Side::Player).hp(), 60);
        assert_eq!(result.next_turn, Side::Player);
        assert_eq!(result.next_action_delay, Duration::ZERO);
        assert_eq!(
            runner.state().log.latest(),
            Some("Computer used flame burst! Dealt 40 damage.")
        );
    }

    #[test]
    fn test_ai_turn_requires_computer_control() {
        let mut runner = create_test_runner(GameMode::VsComputer, "pikachu", "charmander");
        assert_eq!(
            runner.run_ai_turn_with_rng(predictable_rng()).unwrap_err(),
            BattleEngineError::InvalidAction(ActionError::NotComputerControlled(Side::Player))
        );

        let mut two_player = create_test_runner(GameMode::TwoPlayer, "pikachu", "charmander");
        assert_eq!(
            two_player.run_ai_turn_with_rng(predictable_rng()).unwrap_err(),
            BattleEngineError::InvalidAction(ActionError::NotComputerControlled(Side::Player))
        );
    }

    #[test]
    fn test_ai_finishes_a_weak_player() {
        // Squirtle's water gun (34) is the first move that covers 12 HP.
        let state = TestMatchBuilder::new("pikachu", "squirtle")
            .with_hp(Side::Player, 12)
            .with_turn(Side::Opponent)
            .build();
        let mut runner = resume_runner(state);

        let result = runner
            .run_ai_turn_with_rng(TurnRng::new_for_test(vec![50, 50]))
            .unwrap();

        assert_eq!(result.outcome.unwrap().move_index, 0);
        assert!(result.battle_ended);
        assert_eq!(result.winner, Some(Side::Opponent));
        assert_eq!(
            result.events.last(),
            Some(&BattleEvent::BattleEnded { winner: Side::Opponent })
        );
    }

    #[test]
    fn test_winner_is_terminal() {
        let state = TestMatchBuilder::new("charmander", "bulbasaur")
            .with_hp(Side::Opponent, 40)
            .build();
        let mut runner = resume_runner(state);

        let result = runner.submit_move_with_rng(Side::Player, 0, predictable_rng()).unwrap();
        assert!(result.battle_ended);
        assert_eq!(runner.winner(), Some(Side::Player));
        assert_eq!(
            runner.state().log.latest(),
            Some("Player used flame burst! It's super effective! Dealt 80 damage.")
        );
        assert_eq!(
            BattleEvent::BattleEnded { winner: Side::Player }.format(runner.state()),
            Some("Player Wins!".to_string())
        );

        let frozen = runner.state().clone();
        let event_count = runner.get_all_events().len();

        for side in [Side::Player, Side::Opponent] {
            let rejected = runner.submit_move_with_rng(side, 1, predictable_rng());
            assert!(rejected.is_err());
        }
        assert_eq!(
            runner.run_ai_turn_with_rng(predictable_rng()).unwrap_err(),
            BattleEngineError::InvalidAction(ActionError::MatchOver)
        );
        assert_eq!(
            runner.handle_turn_timeout_with_rng(predictable_rng()).unwrap_err(),
            BattleEngineError::InvalidAction(ActionError::MatchOver)
        );

        assert_eq!(runner.state(), &frozen);
        assert_eq!(runner.get_all_events().len(), event_count);
        assert_eq!(runner.next_action_delay(), Duration::ZERO);
    }

    #[test]
    fn test_reset_restores_a_fresh_match() {
        let mut runner = create_test_runner(GameMode::VsComputer, "pikachu", "charmander");
        runner
            .submit_move_with_rng(Side::Player, 0, TurnRng::new_for_test(vec![1, 1, 50]))
            .unwrap();
        runner
            .run_ai_turn_with_rng(TurnRng::new_for_test(vec![1, 95, 5, 1]))
            .unwrap();

        let result = runner.reset_with_rng(TurnRng::new_for_test(vec![]));

        assert_eq!(runner.state(), &create_test_match("pikachu", "charmander"));
        assert_eq!(result.next_turn, Side::Player);
        assert!(result.outcome.is_none());
        assert_eq!(result.events.first(), Some(&BattleEvent::MatchReset));
        assert!(runner.is_awaiting_human());
    }

    #[test]
    fn test_turn_timeout_picks_an_available_move() {
        let state = TestMatchBuilder::new("pikachu", "charmander")
            .with_exhausted_move(Side::Player, 0)
            .build();
        let mut runner = resume_runner(state);

        // Available: punch, strike, kick, run. Roll 1 picks punch.
        let result = runner
            .handle_turn_timeout_with_rng(TurnRng::new_for_test(vec![1, 50, 50, 50]))
            .unwrap();

        let outcome = result.outcome.unwrap();
        assert_eq!(outcome.attacker, Side::Player);
        assert_eq!(outcome.move_index, 1);
        assert_eq!(runner.state().combatant(Side::Player).move_uses.remaining(1), Some(2));

        // Now the computer holds the turn; the timer does not apply to it.
        assert_eq!(
            runner.handle_turn_timeout_with_rng(predictable_rng()).unwrap_err(),
            BattleEngineError::InvalidAction(ActionError::NotHumanControlled(Side::Opponent))
        );
    }

    #[test]
    fn test_event_history_is_incremental() {
        let mut runner = create_test_runner(GameMode::TwoPlayer, "pikachu", "charmander");
        assert_eq!(
            runner.get_all_events(),
            &[BattleEvent::TurnStarted { side: Side::Player }]
        );

        let seen = runner.get_all_events().len();
        let result = runner.submit_move_with_rng(Side::Player, 0, predictable_rng()).unwrap();

        assert_eq!(runner.get_events_since(seen), result.events.as_slice());
        assert!(runner.get_events_since(10_000).is_empty());

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("DamageDealt"));
    }

    #[test]
    fn test_new_runner_picks_a_random_computer_opponent() {
        let roster = builtin_roster().unwrap();
        let config = MatchConfig::vs_computer("Pikachu", None);

        // Roll 100 lands on the last roster entry.
        let runner =
            BattleRunner::new_with_rng(&config, roster, BattleRules::default(), TurnRng::new_for_test(vec![100]))
                .unwrap();

        assert_eq!(runner.state().combatant(Side::Player).creature.id, "pikachu");
        assert_eq!(runner.state().combatant(Side::Opponent).creature.id, "squirtle");
        assert_eq!(runner.whose_turn(), Side::Player);
    }

    #[test]
    fn test_new_runner_configuration_errors() {
        let roster = builtin_roster().unwrap();

        let missing = MatchConfig {
            mode: GameMode::TwoPlayer,
            player_creature: Some("pikachu".to_string()),
            opponent_creature: None,
        };
        assert_eq!(
            BattleRunner::new(&missing, roster, BattleRules::default()).unwrap_err(),
            BattleEngineError::Configuration(ConfigurationError::MissingSelection(Side::Opponent))
        );

        let unknown = MatchConfig::two_player("pikachu", "mewtwo");
        assert_eq!(
            BattleRunner::new(&unknown, roster, BattleRules::default()).unwrap_err(),
            BattleEngineError::Configuration(ConfigurationError::UnknownCreature("mewtwo".to_string()))
        );

        let no_player = MatchConfig {
            mode: GameMode::VsComputer,
            player_creature: None,
            opponent_creature: None,
        };
        assert_eq!(
            BattleRunner::new(&no_player, roster, BattleRules::default()).unwrap_err(),
            BattleEngineError::Configuration(ConfigurationError::MissingSelection(Side::Player))
        );
    }

    #[test]
    fn test_rolled_initiative_can_hand_the_computer_the_opener() {
        let roster = builtin_roster().unwrap();
        let rules = BattleRules {
            roll_initiative: true,
            ..BattleRules::default()
        };
        let config = MatchConfig::vs_computer("pikachu", Some("bulbasaur"));

        let runner = BattleRunner::new_with_rng(&config, roster, rules, TurnRng::new_for_test(vec![51])).unwrap();

        assert_eq!(runner.whose_turn(), Side::Opponent);
        assert!(!runner.is_awaiting_human());
        assert_eq!(runner.next_action_delay(), Duration::from_millis(1500));
    }
}
