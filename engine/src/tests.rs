// ═══════════════════════════════════════════════════════════════════════
// End-to-end draw scenarios and properties
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::allocator::SeatingPolicy;
    use crate::draw::{draw, run_draw};
    use crate::error::DrawError;
    use crate::formation::Formation;
    use crate::types::*;
    use crate::validator::{validate, Shortfall};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Roster with `groups` = [(role, tier, count)], ids assigned in order.
    fn make_roster(groups: &[(Role, u32, usize)]) -> Vec<Player> {
        let mut roster = Vec::new();
        let mut id = 0u64;
        for &(role, tier, count) in groups {
            for _ in 0..count {
                id += 1;
                roster.push(Player::new(id, format!("{}-{}-{}", role, tier, id), role, tier));
            }
        }
        roster
    }

    fn four_three_two(seed: u64) -> Configuration {
        let f: Formation = "4-3-2".parse().unwrap();
        Configuration::new(4, f.capacity()).unwrap().with_seed(seed)
    }

    fn exact_roster() -> Vec<Player> {
        make_roster(&[
            (Role::Goalkeeper, 1, 4),
            (Role::Defender, 1, 8),
            (Role::Defender, 2, 8),
            (Role::Midfielder, 1, 4),
            (Role::Midfielder, 2, 4),
            (Role::Midfielder, 3, 4),
            (Role::Forward, 1, 4),
            (Role::Forward, 2, 4),
        ])
    }

    fn sorted_ids<'a>(players: impl Iterator<Item = &'a Player>) -> Vec<u64> {
        let mut ids: Vec<u64> = players.map(|p| p.id).collect();
        ids.sort_unstable();
        ids
    }

    fn group_counts(p: &Partition, role: Role, tier: u32) -> Vec<usize> {
        p.teams
            .iter()
            .map(|t| t.players(role).iter().filter(|pl| pl.tier == tier).count())
            .collect()
    }

    // ── Scenarios ────────────────────────────────────────────────────────

    #[test]
    fn test_exact_roster_fills_every_team() {
        let roster = exact_roster();
        let cfg = four_three_two(42);
        assert!(validate(&roster, &cfg).ok);

        let p = run_draw(&roster, &cfg).unwrap();
        assert!(!p.has_overflow());
        assert_eq!(p.teams.len(), 4);
        for team in &p.teams {
            assert_eq!(team.count(Role::Goalkeeper), 1);
            assert_eq!(team.count(Role::Defender), 4);
            assert_eq!(team.count(Role::Midfielder), 3);
            assert_eq!(team.count(Role::Forward), 2);
            assert_eq!(team.size(), 10);
            assert!(team.color.is_some());
        }
        // 8 tier-1 defenders over 4 teams: exactly 2 each
        assert_eq!(group_counts(&p, Role::Defender, 1), vec![2, 2, 2, 2]);
        assert_eq!(group_counts(&p, Role::Midfielder, 3), vec![1, 1, 1, 1]);

        assert_eq!(p.team(1).map(|t| t.index), Some(1));
        assert_eq!(p.team(4).map(Team::size), Some(10));
        assert!(p.team(0).is_none());
        assert!(p.team(5).is_none());
    }

    #[test]
    fn test_missing_goalkeeper_stops_before_allocation() {
        let mut roster = exact_roster();
        roster.retain(|p| p.id != 1);
        let cfg = four_three_two(42);

        let report = validate(&roster, &cfg);
        assert!(!report.ok);
        assert_eq!(report.shortfalls.len(), 1);
        assert_eq!(report.shortfalls[&Role::Goalkeeper], Shortfall { required: 4, available: 3 });

        match run_draw(&roster, &cfg) {
            Err(DrawError::InsufficientRoster(r)) => assert_eq!(r, report),
            other => panic!("expected shortfall, got {:?}", other),
        }
    }

    #[test]
    fn test_five_players_two_teams_capacity_two() {
        let roster = make_roster(&[(Role::Midfielder, 1, 5)]);
        let cfg = Configuration::new(2, RoleCapacity::new(0, 0, 2, 0)).unwrap().with_seed(5);
        let p = run_draw(&roster, &cfg).unwrap();

        assert_eq!(p.overflow.len(), 1);
        assert_eq!(group_counts(&p, Role::Midfielder, 1), vec![2, 2]);
        assert_eq!(sorted_ids(p.players()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_same_seed_is_byte_identical() {
        let roster = exact_roster();
        let a = run_draw(&roster, &four_three_two(2025)).unwrap();
        let b = run_draw(&roster, &four_three_two(2025)).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_different_seeds_reorder() {
        let roster = exact_roster();
        let a = run_draw(&roster, &four_three_two(1)).unwrap();
        let b = run_draw(&roster, &four_three_two(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unseeded_draw_is_still_complete() {
        let roster = exact_roster();
        let f: Formation = "4-3-2".parse().unwrap();
        let cfg = Configuration::new(4, f.capacity()).unwrap();
        let p = run_draw(&roster, &cfg).unwrap();
        assert_eq!(sorted_ids(p.players()), sorted_ids(roster.iter()));
    }

    #[test]
    fn test_probe_seats_what_modulo_drops() {
        // DEF capacity 2 on 2 teams: the lone tier-1 defender fills one seat
        // first, so the tier-2 rotation can hit a full team.
        let roster = make_roster(&[(Role::Defender, 1, 1), (Role::Defender, 2, 3)]);
        let base = Configuration::new(2, RoleCapacity::new(0, 2, 0, 0)).unwrap();

        let mut modulo_overflowed = 0;
        for seed in 0..64 {
            let modulo = base.clone().with_seating(SeatingPolicy::Modulo);
            let probe = base.clone().with_seating(SeatingPolicy::Probe);
            let pm = draw(&roster, &modulo, &mut ChaCha8Rng::seed_from_u64(seed));
            let pp = draw(&roster, &probe, &mut ChaCha8Rng::seed_from_u64(seed));

            assert!(!pp.has_overflow(), "probe overflowed with seed {}", seed);
            assert_eq!(pp.seated_count(), 4);
            if pm.has_overflow() {
                modulo_overflowed += 1;
                assert_eq!(pm.overflow.len(), 1);
            }
        }
        assert!(modulo_overflowed > 0);
    }

    #[test]
    fn test_uneven_tiers_stay_balanced_per_group() {
        // A lone defender in tiers 1, 2 and 4 leaves the running DEF totals
        // uneven when the three tier-3 defenders are dealt.
        let roster = make_roster(&[
            (Role::Defender, 1, 1),
            (Role::Defender, 2, 1),
            (Role::Defender, 3, 3),
            (Role::Defender, 4, 1),
        ]);
        let cfg = Configuration::new(3, RoleCapacity::new(0, 2, 0, 0)).unwrap();
        assert!(validate(&roster, &cfg).ok);

        for seed in 0..200 {
            let p = draw(&roster, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));
            assert!(!p.has_overflow(), "overflow with seed {}", seed);
            for tier in 1..=4 {
                let counts = group_counts(&p, Role::Defender, tier);
                let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
                assert!(spread <= 1, "tier {} dealt {:?} with seed {}", tier, counts, seed);
            }
            assert!(p.teams.iter().all(|t| t.count(Role::Defender) == 2));
        }
    }

    #[test]
    fn test_surplus_lands_in_overflow() {
        let roster = make_roster(&[(Role::Goalkeeper, 1, 3), (Role::Goalkeeper, 2, 2)]);
        let cfg = Configuration::new(2, RoleCapacity::new(1, 0, 0, 0)).unwrap().with_seed(8);
        let p = run_draw(&roster, &cfg).unwrap();
        assert_eq!(p.seated_count(), 2);
        assert_eq!(p.overflow.len(), 3);
        // Tier 1 is seated first, so both keepers come from it.
        assert!(p.teams.iter().all(|t| t.players(Role::Goalkeeper)[0].tier == 1));
    }

    #[test]
    fn test_tiers_interleave_in_ascending_order() {
        let roster = make_roster(&[(Role::Forward, 2, 2), (Role::Forward, 1, 2)]);
        let cfg = Configuration::new(2, RoleCapacity::new(0, 0, 0, 2)).unwrap().with_seed(13);
        let p = run_draw(&roster, &cfg).unwrap();
        for team in &p.teams {
            let tiers: Vec<u32> = team.players(Role::Forward).iter().map(|pl| pl.tier).collect();
            assert_eq!(tiers, vec![1, 2]);
        }
    }

    // ── Properties ───────────────────────────────────────────────────────

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn roles() -> impl Strategy<Value = Role> {
            prop_oneof![
                Just(Role::Goalkeeper),
                Just(Role::Defender),
                Just(Role::Midfielder),
                Just(Role::Forward),
            ]
        }

        fn rosters() -> impl Strategy<Value = Vec<Player>> {
            prop::collection::vec((roles(), 1u32..=4), 0..60).prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (role, tier))| Player::new(i as u64, format!("p{}", i), role, tier))
                    .collect()
            })
        }

        fn policies() -> impl Strategy<Value = SeatingPolicy> {
            prop_oneof![Just(SeatingPolicy::Probe), Just(SeatingPolicy::Modulo)]
        }

        proptest! {
            /// Every player ends up in exactly one place and no team exceeds a capacity.
            #[test]
            fn prop_partition_is_exact_and_bounded(
                roster in rosters(),
                team_count in 2usize..6,
                caps in (0usize..3, 0usize..5, 0usize..5, 0usize..4),
                policy in policies(),
                seed in any::<u64>(),
            ) {
                let capacity = RoleCapacity::new(caps.0, caps.1, caps.2, caps.3);
                let cfg = Configuration::new(team_count, capacity).unwrap().with_seating(policy);
                let p = draw(&roster, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));

                prop_assert_eq!(sorted_ids(p.players()), sorted_ids(roster.iter()));
                for team in &p.teams {
                    for role in Role::ALL {
                        prop_assert!(team.count(role) <= capacity.get(role));
                        prop_assert!(team.players(role).iter().all(|pl| pl.role == role));
                    }
                }
            }

            /// Probe only overflows a role once every team is full for it.
            #[test]
            fn prop_probe_overflow_means_role_full(
                roster in rosters(),
                team_count in 2usize..6,
                cap in 0usize..4,
                seed in any::<u64>(),
            ) {
                let cfg = Configuration::new(team_count, RoleCapacity::new(cap, cap, cap, cap)).unwrap();
                let p = draw(&roster, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));
                for pl in &p.overflow {
                    prop_assert!(p.teams.iter().all(|t| t.count(pl.role) == cap));
                }
            }

            /// A single group with room to spare is spread within one per team.
            #[test]
            fn prop_group_spread_at_most_one(
                size in 0usize..30,
                team_count in 2usize..7,
                seed in any::<u64>(),
            ) {
                let roster = make_roster(&[(Role::Defender, 1, size)]);
                let cap = (size + team_count - 1) / team_count;
                let cfg = Configuration::new(team_count, RoleCapacity::new(0, cap, 0, 0)).unwrap();
                let p = draw(&roster, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));

                prop_assert!(!p.has_overflow());
                let counts = group_counts(&p, Role::Defender, 1);
                let max = counts.iter().max().copied().unwrap_or(0);
                let min = counts.iter().min().copied().unwrap_or(0);
                prop_assert!(max - min <= 1);
            }

            /// With one seat per team for every `team_count` players of a role,
            /// each fully seated (role, tier) group is spread within one.
            #[test]
            fn prop_multi_tier_groups_spread_at_most_one(
                roster in rosters(),
                team_count in 2usize..6,
                seed in any::<u64>(),
            ) {
                let available = |role: Role| roster.iter().filter(|p| p.role == role).count();
                let capacity = RoleCapacity::new(
                    available(Role::Goalkeeper) / team_count,
                    available(Role::Defender) / team_count,
                    available(Role::Midfielder) / team_count,
                    available(Role::Forward) / team_count,
                );
                let cfg = Configuration::new(team_count, capacity).unwrap();
                prop_assert!(validate(&roster, &cfg).ok);
                let p = draw(&roster, &cfg, &mut ChaCha8Rng::seed_from_u64(seed));

                for role in Role::ALL {
                    let totals: Vec<usize> = p.teams.iter().map(|t| t.count(role)).collect();
                    prop_assert!(totals.iter().max().unwrap() - totals.iter().min().unwrap() <= 1);

                    for tier in 1u32..=4 {
                        if p.overflow.iter().any(|pl| pl.role == role && pl.tier == tier) {
                            continue;
                        }
                        let counts = group_counts(&p, role, tier);
                        let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
                        prop_assert!(spread <= 1, "{} tier {} dealt {:?}", role, tier, counts);
                    }
                }
            }

            #[test]
            fn prop_formation_round_trip(d in 0usize..12, m in 0usize..12, f in 0usize..12) {
                let formation = Formation::new(d, m, f);
                let parsed: Formation = formation.to_string().parse().unwrap();
                prop_assert_eq!(parsed, formation);
                prop_assert_eq!(parsed.capacity().total(), formation.total());
            }
        }
    }
}
