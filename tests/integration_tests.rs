// End-to-end tests: TSV inputs on disk through to the written reports.

#[cfg(test)]
mod integration_tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use enzyme_correlation::config::AnalysisConfig;
    use enzyme_correlation::correlation::CorrelationMethod;
    use enzyme_correlation::io::{
        all_results_path, load_enzymes, load_pollution, overlap_path, read_results, significant_path,
    };
    use enzyme_correlation::pipeline::{
        AnalysisOptions, analyze, correlate_all, run_all, run_method, run_overlap,
    };
    use enzyme_correlation::{AnalysisError, ErrorPolicy};
    use tempfile::TempDir;

    const POLLUTION: &str = "\
sample\tabundance
S1\t1.0
S2\t2.0
S3\t3.5
S4\t4.0
S5\t5.5
S6\t6.0
S7\t7.5
S8\t8.0
";

    const ENZYMES: &str = "\
# Constructed from biom file
# enzyme abundance table
#EC\tS1\tS2\tS3\tS4\tS5\tS6\tS7\tS8
EC:1.1.1.1\t1.0\t2.2\t3.1\t4.5\t6.4\t5.9\t7.2\t8.4
EC:2.7.7.7\t9.0\t8.1\t6.2\t7.7\t5.4\t4.0\t3.3\t2.1
EC:3.1.1.3\t2.0\t1.0\t4.0\t3.0\t6.0\t5.0\t8.0\t7.0
EC:4.2.1.1\t5.0\t3.0\t6.0\t2.0\t7.0\t4.0\t1.0\t8.0
EC:5.3.1.9\t0.1\t0.4\t0.2\t0.9\t0.5\t1.6\t1.2\t2.5
";

    fn write_inputs(dir: &Path) -> AnalysisConfig {
        let pollution_file = dir.join("pollution_abundance.tsv");
        let enzyme_file = dir.join("enzyme_abundance.tsv");
        fs::write(&pollution_file, POLLUTION).unwrap();
        fs::write(&enzyme_file, ENZYMES).unwrap();

        AnalysisConfig {
            pollution_file,
            enzyme_file,
            output_dir: dir.join("reports"),
            ..AnalysisConfig::default()
        }
    }

    fn header_of(path: &PathBuf) -> String {
        fs::read_to_string(path).unwrap().lines().next().unwrap().to_string()
    }

    #[test]
    fn test_three_sample_load_keeps_input_order() {
        let dir = TempDir::new().unwrap();
        let pollution_file = dir.path().join("p.tsv");
        let enzyme_file = dir.path().join("e.tsv");
        fs::write(&pollution_file, "abundance\n1\n2\n3\n").unwrap();
        fs::write(
            &enzyme_file,
            "meta\nmeta\nID\tA\tB\tC\nzeta\t3\t1\t2\nalpha\t1\t2\t3\nmid\t2\t3\t1\n",
        )
        .unwrap();

        let pollution = load_pollution(&pollution_file).unwrap();
        let enzymes = load_enzymes(&enzyme_file, 2).unwrap();

        for method in CorrelationMethod::ALL {
            let scored = correlate_all(&pollution, &enzymes, method, ErrorPolicy::Abort).unwrap();
            let names: Vec<&str> = scored.records.iter().map(|s| s.enzyme.as_str()).collect();
            assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        }
    }

    #[test]
    fn test_run_all_writes_every_report() {
        let dir = TempDir::new().unwrap();
        let config = write_inputs(dir.path());

        let summary = run_all(&config).unwrap();
        assert_eq!(summary.pearson.all.len(), 5);
        assert_eq!(summary.spearman.all.len(), 5);

        for method in CorrelationMethod::ALL {
            let all = all_results_path(&config.output_dir, method);
            let sig = significant_path(&config.output_dir, method);
            assert!(all.exists() && sig.exists());
            assert_eq!(
                header_of(&all),
                "Enzyme\tCorrelation\tt_value\tp_value\tconf_lower\tconf_upper"
            );
        }

        let overlap_file = overlap_path(&config.output_dir);
        assert_eq!(
            header_of(&overlap_file),
            "Enzyme\tPearson_Correlation\tPearson_t_value\tPearson_p_value\tPearson_conf_lower\t\
             Pearson_conf_upper\tSpearman_Correlation\tSpearman_t_value\tSpearman_p_value\t\
             Spearman_conf_lower\tSpearman_conf_upper"
        );

        // The strongly positive enzyme leads both rankings and is significant under both
        assert_eq!(summary.pearson.all[0].enzyme, "EC:1.1.1.1");
        assert_eq!(summary.spearman.all[0].enzyme, "EC:1.1.1.1");
        assert!(summary.overlap.iter().any(|o| o.enzyme == "EC:1.1.1.1"));

        for record in &summary.overlap {
            assert!(summary.pearson.significant.iter().any(|r| r.enzyme == record.enzyme));
            assert!(summary.spearman.significant.iter().any(|r| r.enzyme == record.enzyme));
        }

        // Overlap follows the Spearman significant order
        let spearman_order: Vec<&str> = summary
            .spearman
            .significant
            .iter()
            .map(|r| r.enzyme.as_str())
            .filter(|name| summary.overlap.iter().any(|o| o.enzyme == *name))
            .collect();
        let overlap_order: Vec<&str> = summary.overlap.iter().map(|o| o.enzyme.as_str()).collect();
        assert_eq!(spearman_order, overlap_order);
    }

    #[test]
    fn test_written_tables_match_memory() {
        let dir = TempDir::new().unwrap();
        let config = write_inputs(dir.path());

        let report = run_method(&config, CorrelationMethod::Pearson).unwrap();
        let all = read_results(&all_results_path(&config.output_dir, CorrelationMethod::Pearson)).unwrap();
        let sig = read_results(&significant_path(&config.output_dir, CorrelationMethod::Pearson)).unwrap();

        assert_eq!(all, report.all);
        assert_eq!(sig, report.significant);
    }

    #[test]
    fn test_file_based_overlap_matches_in_memory() {
        let dir = TempDir::new().unwrap();
        let config = write_inputs(dir.path());

        let summary = run_all(&config).unwrap();
        fs::remove_file(overlap_path(&config.output_dir)).unwrap();

        let overlap = run_overlap(&config).unwrap();
        assert_eq!(overlap, summary.overlap);
        assert!(overlap_path(&config.output_dir).exists());
    }

    #[test]
    fn test_separate_method_runs_then_overlap() {
        let dir = TempDir::new().unwrap();
        let config = write_inputs(dir.path());

        let pearson = run_method(&config, CorrelationMethod::Pearson).unwrap();
        let spearman = run_method(&config, CorrelationMethod::Spearman).unwrap();
        let overlap = run_overlap(&config).unwrap();

        for record in &overlap {
            let p = pearson.significant.iter().find(|r| r.enzyme == record.enzyme).unwrap();
            let s = spearman.significant.iter().find(|r| r.enzyme == record.enzyme).unwrap();
            assert_eq!(&record.pearson, p);
            assert_eq!(&record.spearman, s);
        }
    }

    #[test]
    fn test_overlap_requires_significant_tables() {
        let dir = TempDir::new().unwrap();
        let config = AnalysisConfig {
            output_dir: dir.path().to_path_buf(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(run_overlap(&config), Err(AnalysisError::MissingFile(_))));
    }

    #[test]
    fn test_mismatched_enzyme_width_aborts() {
        let dir = TempDir::new().unwrap();
        let mut config = write_inputs(dir.path());
        fs::write(&config.pollution_file, "abundance\n1\n2\n3\n4\n").unwrap();

        let err = run_method(&config, CorrelationMethod::Spearman).unwrap_err();
        assert!(matches!(err, AnalysisError::ShapeMismatch { expected: 4, found: 8, .. }));

        // Skip policy reports every enzyme instead of failing
        config.error_policy = ErrorPolicy::Skip;
        let report = run_method(&config, CorrelationMethod::Spearman).unwrap();
        assert!(report.all.is_empty());
        assert_eq!(report.skipped.len(), 5);
    }

    #[test]
    fn test_missing_inputs() {
        let dir = TempDir::new().unwrap();
        let config = AnalysisConfig {
            pollution_file: dir.path().join("absent.tsv"),
            output_dir: dir.path().to_path_buf(),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            run_method(&config, CorrelationMethod::Pearson),
            Err(AnalysisError::MissingFile(_))
        ));
    }

    #[test]
    fn test_custom_confidence_level_widens_intervals() {
        let dir = TempDir::new().unwrap();
        let config = write_inputs(dir.path());
        let pollution = load_pollution(&config.pollution_file).unwrap();
        let enzymes = load_enzymes(&config.enzyme_file, 2).unwrap();

        let narrow = analyze(&pollution, &enzymes, &AnalysisOptions::new(CorrelationMethod::Pearson)).unwrap();
        let wide = analyze(
            &pollution,
            &enzymes,
            &AnalysisOptions {
                confidence_level: 0.99,
                ..AnalysisOptions::new(CorrelationMethod::Pearson)
            },
        )
        .unwrap();

        for (n, w) in narrow.all.iter().zip(&wide.all) {
            assert_eq!(n.enzyme, w.enzyme);
            assert_eq!(n.p_value, w.p_value);
            assert!(w.conf_lower < n.conf_lower && w.conf_upper > n.conf_upper);
        }
    }
}
