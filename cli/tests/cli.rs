use std::io::Write;
use std::process::{Command, Output};

use approx::assert_relative_eq;
use indoc::indoc;

fn nigfit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nigfit"))
        .args(args)
        .output()
        .expect("failed to execute process")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

mod fit {
    use super::*;

    fn parse_params(line: &str) -> Vec<f64> {
        line.split_whitespace()
            .map(|x| x.parse::<f64>().unwrap())
            .collect()
    }

    #[test]
    fn prints_four_values() {
        let output = nigfit(&["fit", "-n", "200", "--seed", "1337"]);
        assert!(output.status.success());

        let params = parse_params(stdout(&output).trim());
        assert_eq!(params.len(), 4);
        assert!(params.iter().all(|x| x.is_finite()));
        assert!(params[1] > 0.0 && params[2] > 0.0 && params[3] > 0.0);
    }

    #[test]
    fn seeded_runs_match() {
        let args = ["fit", "-n", "200", "--seed", "7", "--loss", "quantile"];
        let out_a = nigfit(&args);
        let out_b = nigfit(&args);
        assert!(out_a.status.success());
        assert_eq!(stdout(&out_a), stdout(&out_b));
    }

    #[test]
    fn yaml_output_has_the_fit() {
        let output = nigfit(&["fit", "-n", "200", "--seed", "3", "--yaml"]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.contains("params:"));
        assert!(text.contains("loss:"));
        assert!(text.contains("method: nelder_mead"));
        assert!(text.contains("objective: moments"));
    }

    #[test]
    fn reads_config_file() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config
            .write_all(
                indoc!(
                    "
                    seed: 1337
                    objective:
                      loss: elementwise
                      n_samples: 100
                    optimizer:
                      method: bfgs
                      bfgs:
                        max_iters: 3
                    "
                )
                .as_bytes(),
            )
            .unwrap();

        let path = config.path().to_str().unwrap();
        let output = nigfit(&["fit", "--config", path, "--yaml"]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.contains("method: bfgs"));
        assert!(text.contains("objective: elementwise"));
    }

    #[test]
    fn bad_config_fails() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        config.write_all(b"n_iters: 3\n").unwrap();

        let path = config.path().to_str().unwrap();
        let output = nigfit(&["fit", "--config", path]);
        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn missing_config_fails() {
        let output = nigfit(&["fit", "--config", "/no/such/config.yaml"]);
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn invalid_init_is_rejected() {
        let output = nigfit(&["fit", "--init", "0,-0.5,1,0.5"]);
        assert!(!output.status.success());
    }
}

mod sample {
    use super::*;

    #[test]
    fn writes_n_rows_of_csv() {
        let output = nigfit(&[
            "sample", "-p", "0,0.054,1.12,0.4", "-n", "500", "--seed", "1",
        ]);
        assert!(output.status.success());

        let text = stdout(&output);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,sigma2"));

        let rows: Vec<(f64, f64)> = lines
            .map(|line| {
                let mut cells = line.split(',');
                let x = cells.next().unwrap().parse::<f64>().unwrap();
                let sigma2 = cells.next().unwrap().parse::<f64>().unwrap();
                (x, sigma2)
            })
            .collect();

        assert_eq!(rows.len(), 500);
        for (x, sigma2) in rows {
            assert!(x.is_finite());
            assert!(sigma2.is_finite() && sigma2 > 0.0);
        }
    }

    #[test]
    fn seeded_samples_match() {
        let args = ["sample", "-p", "0,0.5,1,0.5", "-n", "20", "--seed", "9"];
        assert_eq!(stdout(&nigfit(&args)), stdout(&nigfit(&args)));
    }
}

mod density {
    use super::*;

    #[test]
    fn known_value() {
        let output = nigfit(&["density", "-p", "0,1,1,1", "0", "1"]);
        assert!(output.status.success());

        let f: f64 = stdout(&output).trim().parse().unwrap();
        let expected = (-1.0_f64).exp() / (2.0 * std::f64::consts::PI).sqrt();
        assert_relative_eq!(f, expected, epsilon = 1E-10);
    }

    #[test]
    fn log_density() {
        let output = nigfit(&["density", "-p", "0,1,1,1", "--log", "0", "1"]);
        assert!(output.status.success());

        let ln_f: f64 = stdout(&output).trim().parse().unwrap();
        let expected = -1.0 - 0.5 * (2.0 * std::f64::consts::PI).ln();
        assert_relative_eq!(ln_f, expected, epsilon = 1E-10);
    }

    #[test]
    fn zero_outside_support() {
        let output = nigfit(&["density", "-p", "0,1,1,1", "0", "-1"]);
        assert!(output.status.success());
        assert_eq!(stdout(&output).trim(), "0");
    }
}

mod moments {
    use super::*;

    #[test]
    fn prints_yaml_moments() {
        let output = nigfit(&["moments", "-p", "1,2,6,10"]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.contains("mean_mean: 1"));
        assert!(text.contains("var_mean: 2"));
    }
}
