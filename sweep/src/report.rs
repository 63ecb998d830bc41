//! Plain text rendering of sweep results.

use std::io::{self, Write};

use itertools::Itertools;
use jump_bucketing::{DistributionTable, MigrationResult};

use crate::{stats::uniformity, Case, Outcome};

#[derive(Clone, Copy, Debug, Default)]
pub struct ReportOptions {
    /// Also print how uniform each new distribution is.
    pub uniformity: bool,
}

pub fn write_cases<'a>(
    output: &mut impl Write,
    cases: impl IntoIterator<Item = &'a Case>,
    options: ReportOptions,
) -> io::Result<()> {
    for case in cases {
        write_case(output, case, options)?;
    }
    output.flush()
}

pub fn write_case(output: &mut impl Write, case: &Case, options: ReportOptions) -> io::Result<()> {
    writeln!(
        output,
        "Case under analysis: from {} to {} buckets",
        case.old_count,
        case.new_count()
    )?;
    for Outcome { algorithm, result } in &case.outcomes {
        writeln!(output, "*** {algorithm} ***")?;
        write_distributions(output, result)?;
        if options.uniformity {
            write_uniformity(output, result)?;
        }
        write_move_ratio(output, result, case.delta)?;
    }
    writeln!(output, "End of case")?;
    writeln!(output)
}

fn write_distributions(output: &mut impl Write, result: &MigrationResult) -> io::Result<()> {
    writeln!(output, "Old distribution")?;
    write_table(output, result.old_table())?;
    writeln!(output, "New distribution")?;
    write_table(output, result.new_table())
}

fn write_table(output: &mut impl Write, table: &DistributionTable) -> io::Result<()> {
    for (bucket, count) in table {
        writeln!(output, "{bucket}: {count}")?;
    }
    writeln!(output)
}

fn write_uniformity(output: &mut impl Write, result: &MigrationResult) -> io::Result<()> {
    let u = uniformity(result.new_table(), result.new_count());
    let p_value = u
        .p_value
        .map_or_else(|| "n/a".to_string(), |p| format!("{p:.4}"));
    writeln!(
        output,
        "Uniformity of the new distribution: L1 distance {:.4}, chi-squared p-value {p_value}",
        u.l1_distance
    )
}

fn write_move_ratio(
    output: &mut impl Write,
    result: &MigrationResult,
    delta: i64,
) -> io::Result<()> {
    let verb = if delta >= 0 { "Adding" } else { "Removing" };
    let num_buckets = delta.unsigned_abs();
    let noun = if num_buckets == 1 { "bucket" } else { "buckets" };
    writeln!(
        output,
        "{verb} {num_buckets} {noun} generates {:.2} % of moves ({} of {}, minimum {:.2} %)",
        result.move_ratio(),
        result.moves_needed(),
        result.total_occurrences(),
        result.expected_move_ratio(),
    )?;
    writeln!(output)
}

/// One line per case: bucket counts followed by each algorithm's move ratio.
pub fn write_summary<'a>(
    output: &mut impl Write,
    cases: impl IntoIterator<Item = &'a Case>,
) -> io::Result<()> {
    for case in cases {
        let ratios = case
            .outcomes
            .iter()
            .map(|o| format!("{}: {:.2} %", o.algorithm, o.result.move_ratio()))
            .join(", ");
        writeln!(output, "{} -> {}: {ratios}", case.old_count, case.new_count())?;
    }
    output.flush()
}

#[cfg(test)]
mod tests {
    use crate::{
        sweep::{run, DEFAULT_ALGORITHMS},
        SweepPlan,
    };

    use super::*;

    const LETTERS: [&str; 10] = ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"];

    fn letters_cases(bucket_counts: std::ops::RangeInclusive<u32>, delta: i64) -> Vec<Case> {
        let plan = SweepPlan {
            bucket_counts,
            delta,
            algorithms: DEFAULT_ALGORITHMS.to_vec(),
        };
        run(&LETTERS, &plan).unwrap()
    }

    fn render(cases: &[Case], options: ReportOptions) -> String {
        let mut output = Vec::new();
        write_cases(&mut output, cases, options).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn four_to_five() {
        let text = render(&letters_cases(4..=4, 1), ReportOptions::default());
        let expected = "\
Case under analysis: from 4 to 5 buckets
*** Consistent hashing ***
Old distribution
0: 2
1: 2
2: 4
3: 2

New distribution
0: 1
1: 2
2: 4
3: 1
4: 2

Adding 1 bucket generates 20.00 % of moves (2 of 10, minimum 20.00 %)

*** Modulo arithmetic ***
Old distribution
0: 1
1: 1
2: 4
3: 4

New distribution
0: 3
1: 1
2: 2
3: 1
4: 3

Adding 1 bucket generates 80.00 % of moves (8 of 10, minimum 20.00 %)

End of case

";
        assert_eq!(text, expected);
    }

    #[test]
    fn removing_buckets() {
        let text = render(&letters_cases(5..=5, -2), ReportOptions::default());
        assert!(text.starts_with("Case under analysis: from 5 to 3 buckets\n"));
        assert!(text.contains("Removing 2 buckets generates "));
        assert!(text.contains("minimum 40.00 %"));
    }

    #[test]
    fn uniformity_line() {
        let options = ReportOptions { uniformity: true };
        let text = render(&letters_cases(4..=4, 1), options);
        assert_eq!(
            text.matches("Uniformity of the new distribution: L1 distance ")
                .count(),
            2
        );
    }

    #[test]
    fn summary() {
        let mut output = Vec::new();
        write_summary(&mut output, &letters_cases(4..=5, 1)).unwrap();
        let text = String::from_utf8(output).unwrap();
        let first = text.lines().next().unwrap();
        assert_eq!(
            first,
            "4 -> 5: Consistent hashing: 20.00 %, Modulo arithmetic: 80.00 %"
        );
        assert_eq!(text.lines().count(), 2);
    }
}
