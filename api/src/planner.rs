//! Group and knockout skeleton generation.
//!
//! Pure functions over tournament shape parameters: no I/O, no clock, no
//! randomness. Inputs are clamped rather than rejected, and shapes that do
//! not fill a power-of-two bracket degrade to `"TBD"` seeds instead of
//! erroring. Callers that want to warn about an infeasible shape compare
//! `group_count * qualifiers_per_group` against [`is_power_of_two`].

use serde::{Deserialize, Serialize};

/// Structural floor for group size. Groups below four slots are degenerate
/// for round-robin play, so skeleton generation never produces one.
pub const MIN_TEAMS_PER_GROUP: usize = 4;

// ---------------------------------------------------------------------------
// Skeleton types
// ---------------------------------------------------------------------------

/// One group in the group phase.
///
/// `participants` is an ordered slot list. Empty slots are empty strings,
/// never absent entries, so the slot count is stable for display and
/// round-robin pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupBucket {
    pub id: String,
    pub name: String,
    pub participants: Vec<String>,
}

/// One match in the knockout bracket.
///
/// `round_index` 0 is the first bracket round; increasing indices move toward
/// the final. In round 0 `home`/`away` are seed labels (`"A1"`) or `"TBD"`;
/// in later rounds they are `"Winner {feeding match name}"` placeholders.
/// Field names serialize camelCase so draft files keep the historical shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketMatch {
    pub id: String,
    pub name: String,
    pub round: String,
    pub round_index: usize,
    pub home: String,
    pub away: String,
}

// ---------------------------------------------------------------------------
// Shape arithmetic
// ---------------------------------------------------------------------------

/// True iff `n > 0` and `n` has exactly one set bit. Total over integers.
pub fn is_power_of_two(n: i64) -> bool {
    n > 0 && (n & (n - 1)) == 0
}

/// Smallest power of two `>= n`, with a floor of 1.
pub fn next_power_of_two(n: i64) -> u64 {
    if n <= 1 {
        return 1;
    }
    let target = n as u64;
    let mut p: u64 = 1;
    while p < target {
        p *= 2;
    }
    p
}

/// Label for a round entered by `size` slots (`2 * matches`).
pub fn round_name_for_size(size: u64) -> String {
    match size {
        2 => "Final".to_string(),
        4 => "Semifinals".to_string(),
        8 => "Quarterfinals".to_string(),
        _ => format!("Round of {size}"),
    }
}

/// Group letter by index: 0 => 'A', 1 => 'B', ...
pub fn group_letter(index: usize) -> char {
    char::from_u32('A' as u32 + index as u32).unwrap_or('?')
}

// ---------------------------------------------------------------------------
// Skeleton generation
// ---------------------------------------------------------------------------

/// Build the group-phase skeleton: `group_count` groups (min 1) of
/// `teams_per_group` slots (min [`MIN_TEAMS_PER_GROUP`]).
///
/// `existing_teams` is redistributed round-robin so entered names survive a
/// shape change: source index `i` lands in group `i % group_count`, row
/// `i / group_count`. Names beyond the new capacity are dropped silently —
/// best effort, not a failure.
pub fn generate_groups_skeleton(
    group_count: usize,
    teams_per_group: usize,
    existing_teams: &[String],
) -> Vec<GroupBucket> {
    let group_count = group_count.max(1);
    let teams_per_group = teams_per_group.max(MIN_TEAMS_PER_GROUP);
    let slots = group_count * teams_per_group;

    let mut groups: Vec<GroupBucket> = (0..group_count)
        .map(|idx| GroupBucket {
            id: format!("g_{}", idx + 1),
            name: format!("Group {}", group_letter(idx)),
            participants: vec![String::new(); teams_per_group],
        })
        .collect();

    for (idx, team) in existing_teams.iter().take(slots).enumerate() {
        let group_idx = idx % group_count;
        let row_idx = idx / group_count;
        if row_idx < teams_per_group {
            groups[group_idx].participants[row_idx] = team.clone();
        }
    }

    groups
}

/// Build the knockout skeleton for `group_count` groups qualifying
/// `qualifiers_per_group` each (both clamped to min 1).
///
/// The bracket holds `next_power_of_two(max(2, qualified))` slots; the seed
/// list is group-major (`A1, A2, ..., B1, ...`) padded with `"TBD"` to the
/// bracket size. Round 0 pairs seeds from opposite ends of the list —
/// match `i` is `seeds[i]` vs `seeds[round_size - 1 - i]` — which keeps
/// interleaved same-group qualifiers apart in round one. Sequential pairing
/// would silently change bracket fairness; keep this rule.
///
/// Later rounds take `"Winner {name}"` from the two consecutive feeding
/// matches (`2i`, `2i+1`) of the previous round. Match names `Match E{n}`
/// number sequentially across the whole bracket, not per round.
pub fn generate_bracket_skeleton(
    group_count: usize,
    qualifiers_per_group: usize,
) -> Vec<BracketMatch> {
    let group_count = group_count.max(1);
    let qualifiers_per_group = qualifiers_per_group.max(1);
    let qualified = group_count * qualifiers_per_group;
    let bracket_size = next_power_of_two(qualified.max(2) as i64) as usize;

    let mut seeds: Vec<String> = Vec::with_capacity(bracket_size);
    for g in 0..group_count {
        for pos in 1..=qualifiers_per_group {
            seeds.push(format!("{}{pos}", group_letter(g)));
        }
    }
    while seeds.len() < bracket_size {
        seeds.push("TBD".to_string());
    }

    let mut matches: Vec<BracketMatch> = Vec::with_capacity(bracket_size - 1);
    let mut previous_round_names: Vec<String> = Vec::new();
    let mut round_size = bracket_size;
    let mut round_index = 0usize;
    let mut match_counter = 1usize;

    while round_size >= 2 {
        let round_matches = round_size / 2;
        let round_name = round_name_for_size(round_size as u64);
        let mut this_round_names: Vec<String> = Vec::with_capacity(round_matches);

        for i in 0..round_matches {
            let name = format!("Match E{match_counter}");
            match_counter += 1;

            let (home, away) = if round_index == 0 {
                (seeds[i].clone(), seeds[round_size - 1 - i].clone())
            } else {
                (
                    format!("Winner {}", previous_round_names[2 * i]),
                    format!("Winner {}", previous_round_names[2 * i + 1]),
                )
            };

            this_round_names.push(name.clone());
            matches.push(BracketMatch {
                id: format!("bm_{round_index}_{}", i + 1),
                name,
                round: round_name.clone(),
                round_index,
                home,
                away,
            });
        }

        previous_round_names = this_round_names;
        round_size /= 2;
        round_index += 1;
    }

    matches
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_power_of_two_membership() {
        for n in [1i64, 2, 4, 8, 16, 1024] {
            assert!(is_power_of_two(n), "{n} is a power of two");
        }
        for n in [0i64, -1, -8, 3, 6, 12, 100] {
            assert!(!is_power_of_two(n), "{n} is not a power of two");
        }
    }

    #[test]
    fn test_next_power_of_two_is_smallest_ceiling() {
        assert_eq!(next_power_of_two(5), 8);
        assert_eq!(next_power_of_two(8), 8);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(9), 16);
        for n in 1i64..=512 {
            let p = next_power_of_two(n);
            assert!(is_power_of_two(p as i64));
            assert!(p as i64 >= n);
            assert!(p == 1 || (p / 2) < n as u64, "{p} is not the smallest for {n}");
        }
    }

    #[test]
    fn test_next_power_of_two_floors_at_one() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(-17), 1);
    }

    #[test]
    fn test_round_names() {
        assert_eq!(round_name_for_size(2), "Final");
        assert_eq!(round_name_for_size(4), "Semifinals");
        assert_eq!(round_name_for_size(8), "Quarterfinals");
        assert_eq!(round_name_for_size(16), "Round of 16");
        assert_eq!(round_name_for_size(32), "Round of 32");
    }

    #[test]
    fn test_group_letters() {
        assert_eq!(group_letter(0), 'A');
        assert_eq!(group_letter(2), 'C');
        assert_eq!(group_letter(25), 'Z');
    }

    #[test]
    fn test_groups_skeleton_empty_input() {
        let groups = generate_groups_skeleton(3, 4, &[]);
        assert_eq!(groups.len(), 3);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Group A", "Group B", "Group C"]);
        for g in &groups {
            assert_eq!(g.participants.len(), 4);
            assert!(g.participants.iter().all(String::is_empty));
        }
    }

    #[test]
    fn test_groups_skeleton_ids_are_one_based() {
        let groups = generate_groups_skeleton(2, 4, &[]);
        assert_eq!(groups[0].id, "g_1");
        assert_eq!(groups[1].id, "g_2");
    }

    #[test]
    fn test_groups_skeleton_round_robin_distribution() {
        let teams: Vec<String> = ["P1", "P2", "P3", "P4", "P5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = generate_groups_skeleton(2, 4, &teams);
        assert_eq!(groups[0].participants, vec!["P1", "P3", "P5", ""]);
        assert_eq!(groups[1].participants, vec!["P2", "P4", "", ""]);
    }

    #[test]
    fn test_groups_skeleton_drops_overflow_silently() {
        // 1 group of 4 slots, 6 names: P5 and P6 are beyond capacity.
        let teams: Vec<String> = (1..=6).map(|n| format!("P{n}")).collect();
        let groups = generate_groups_skeleton(1, 4, &teams);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].participants, vec!["P1", "P2", "P3", "P4"]);
    }

    #[test]
    fn test_groups_skeleton_clamps_inputs() {
        let groups = generate_groups_skeleton(0, 2, &[]);
        assert_eq!(groups.len(), 1, "group count clamps to 1");
        assert_eq!(groups[0].participants.len(), 4, "group size clamps to 4");
    }

    #[test]
    fn test_bracket_total_match_count() {
        for (groups, quals) in [(1, 1), (2, 2), (3, 2), (4, 2), (5, 3), (8, 4)] {
            let qualified = (groups * quals) as i64;
            let bracket_size = next_power_of_two(qualified.max(2));
            let matches = generate_bracket_skeleton(groups, quals);
            assert_eq!(
                matches.len() as u64,
                bracket_size - 1,
                "single elimination is slots-1 matches for shape {groups}x{quals}"
            );
        }
    }

    #[test]
    fn test_bracket_round_zero_pairs_top_vs_bottom() {
        // qualified = 4, seeds = [A1, A2, B1, B2]
        let matches = generate_bracket_skeleton(2, 2);
        assert_eq!(matches[0].home, "A1");
        assert_eq!(matches[0].away, "B2");
        assert_eq!(matches[1].home, "A2");
        assert_eq!(matches[1].away, "B1");
    }

    #[test]
    fn test_bracket_winner_propagation() {
        let matches = generate_bracket_skeleton(2, 2);
        assert_eq!(matches.len(), 3);
        let last = &matches[2];
        assert_eq!(last.round, "Final");
        assert_eq!(last.round_index, 1);
        assert_eq!(last.home, "Winner Match E1");
        assert_eq!(last.away, "Winner Match E2");
    }

    #[test]
    fn test_bracket_pads_with_tbd() {
        // qualified = 6 -> bracket of 8, two TBD seeds at the tail.
        let matches = generate_bracket_skeleton(3, 2);
        let round0: Vec<&BracketMatch> = matches.iter().filter(|m| m.round_index == 0).collect();
        assert_eq!(round0.len(), 4);
        // seeds = [A1, A2, B1, B2, C1, C2, TBD, TBD]
        assert_eq!(round0[0].home, "A1");
        assert_eq!(round0[0].away, "TBD");
        assert_eq!(round0[1].home, "A2");
        assert_eq!(round0[1].away, "TBD");
        assert_eq!(round0[2].home, "B1");
        assert_eq!(round0[2].away, "C2");
        assert_eq!(round0[3].home, "B2");
        assert_eq!(round0[3].away, "C1");
    }

    #[test]
    fn test_bracket_round_labels_and_indices() {
        // qualified = 8: Quarterfinals, Semifinals, Final.
        let matches = generate_bracket_skeleton(4, 2);
        let labels: Vec<(&str, usize)> = matches
            .iter()
            .map(|m| (m.round.as_str(), m.round_index))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("Quarterfinals", 0),
                ("Quarterfinals", 0),
                ("Quarterfinals", 0),
                ("Quarterfinals", 0),
                ("Semifinals", 1),
                ("Semifinals", 1),
                ("Final", 2),
            ]
        );
    }

    #[test]
    fn test_bracket_match_names_number_globally() {
        let matches = generate_bracket_skeleton(4, 2);
        let names: Vec<String> = matches.iter().map(|m| m.name.clone()).collect();
        let expected: Vec<String> = (1..=7).map(|n| format!("Match E{n}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_bracket_ids_encode_round_and_position() {
        let matches = generate_bracket_skeleton(2, 2);
        assert_eq!(matches[0].id, "bm_0_1");
        assert_eq!(matches[1].id, "bm_0_2");
        assert_eq!(matches[2].id, "bm_1_1");
    }

    #[test]
    fn test_bracket_is_deterministic() {
        let a = generate_bracket_skeleton(5, 2);
        let b = generate_bracket_skeleton(5, 2);
        assert_eq!(a, b);
        let ga = generate_groups_skeleton(3, 5, &["X".to_string()]);
        let gb = generate_groups_skeleton(3, 5, &["X".to_string()]);
        assert_eq!(ga, gb);
    }

    #[test]
    fn test_bracket_minimum_shape() {
        // qualified = 1 still builds a bracket of 2: one match, away is TBD.
        let matches = generate_bracket_skeleton(1, 1);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].home, "A1");
        assert_eq!(matches[0].away, "TBD");
        assert_eq!(matches[0].round, "Final");
    }

    #[test]
    fn test_bracket_clamps_inputs() {
        let matches = generate_bracket_skeleton(0, 0);
        assert_eq!(matches.len(), 1, "shape clamps to 1x1 -> bracket of 2");
    }

    #[test]
    fn test_match_serializes_camel_case() {
        let m = BracketMatch {
            id: "bm_0_1".into(),
            name: "Match E1".into(),
            round: "Final".into(),
            round_index: 0,
            home: "A1".into(),
            away: "TBD".into(),
        };
        let json = serde_json::to_value(&m).expect("serialize");
        assert!(json.get("roundIndex").is_some(), "draft shape uses roundIndex");
        assert!(json.get("round_index").is_none());
    }
}
