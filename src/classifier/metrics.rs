//! Binary classification metrics: accuracy, confusion matrix and a
//! per-class precision / recall / F1 report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classifier::Label;
use crate::error::{PipelineError, Result};

fn check_lengths(predicted: &[Label], actual: &[Label]) -> Result<()> {
    if predicted.len() != actual.len() {
        return Err(PipelineError::LabelMismatch {
            vectors: predicted.len(),
            labels: actual.len(),
        });
    }
    if actual.is_empty() {
        return Err(PipelineError::InvalidInput("cannot score an empty label set".to_string()));
    }
    Ok(())
}

/// Fraction of positions where `predicted` equals `actual`
pub fn accuracy(predicted: &[Label], actual: &[Label]) -> Result<f64> {
    check_lengths(predicted, actual)?;
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    Ok(correct as f64 / actual.len() as f64)
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// 2×2 confusion matrix, `counts[actual][predicted]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn from_labels(predicted: &[Label], actual: &[Label]) -> Result<Self> {
        check_lengths(predicted, actual)?;
        let mut counts = [[0usize; 2]; 2];
        for (p, a) in predicted.iter().zip(actual) {
            counts[a.as_index()][p.as_index()] += 1;
        }
        Ok(Self { counts })
    }

    #[inline]
    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.as_index()][predicted.as_index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }

    /// samples whose true class is `label`
    pub fn support(&self, label: Label) -> usize {
        self.counts[label.as_index()].iter().sum()
    }

    /// samples predicted as `label`
    pub fn predicted(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.as_index()]).sum()
    }
}

/// Precision, recall and F1 of one class, treating it as positive
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// Undefined ratios (no predictions, no support) are reported as 0.0
    pub fn for_label(matrix: &ConfusionMatrix, label: Label) -> Self {
        let tp = matrix.get(label, label);
        let precision = ratio(tp, matrix.predicted(label));
        let recall = ratio(tp, matrix.support(label));
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        Self {
            precision,
            recall,
            f1,
            support: matrix.support(label),
        }
    }
}

/// Per-class metrics plus accuracy and averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub ham: ClassMetrics,
    pub spam: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

impl ClassificationReport {
    pub fn from_labels(predicted: &[Label], actual: &[Label]) -> Result<Self> {
        let confusion = ConfusionMatrix::from_labels(predicted, actual)?;
        let ham = ClassMetrics::for_label(&confusion, Label::Ham);
        let spam = ClassMetrics::for_label(&confusion, Label::Spam);
        let total = confusion.total();

        let macro_avg = ClassMetrics {
            precision: (ham.precision + spam.precision) / 2.0,
            recall: (ham.recall + spam.recall) / 2.0,
            f1: (ham.f1 + spam.f1) / 2.0,
            support: total,
        };
        let weight = |h: f64, s: f64| (h * ham.support as f64 + s * spam.support as f64) / total as f64;
        let weighted_avg = ClassMetrics {
            precision: weight(ham.precision, spam.precision),
            recall: weight(ham.recall, spam.recall),
            f1: weight(ham.f1, spam.f1),
            support: total,
        };

        Ok(Self {
            ham,
            spam,
            accuracy: ratio(confusion.correct(), total),
            macro_avg,
            weighted_avg,
            confusion,
        })
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        match label {
            Label::Ham => &self.ham,
            Label::Spam => &self.spam,
        }
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for label in Label::ALL {
            write_row(f, &label.to_string(), self.class(label))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.confusion.total()
        )?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Label::{Ham, Spam};

    #[test]
    fn accuracy_counts_matches() {
        let acc = accuracy(&[Ham, Spam, Spam, Ham], &[Ham, Spam, Ham, Ham]).unwrap();
        assert!((acc - 0.75).abs() < 1e-12);
        assert!(matches!(accuracy(&[Ham], &[]), Err(PipelineError::LabelMismatch { .. })));
        assert!(accuracy(&[], &[]).is_err());
    }

    #[test]
    fn confusion_matrix_layout() {
        let predicted = [Spam, Spam, Ham, Ham, Spam];
        let actual = [Spam, Ham, Ham, Spam, Spam];
        let m = ConfusionMatrix::from_labels(&predicted, &actual).unwrap();
        assert_eq!(m.get(Spam, Spam), 2);
        assert_eq!(m.get(Ham, Spam), 1);
        assert_eq!(m.get(Spam, Ham), 1);
        assert_eq!(m.get(Ham, Ham), 1);
        assert_eq!(m.total(), 5);
        assert_eq!(m.support(Spam), 3);
        assert_eq!(m.predicted(Spam), 3);
    }

    #[test]
    fn report_per_class_metrics() {
        let predicted = [Spam, Spam, Ham, Ham, Spam];
        let actual = [Spam, Ham, Ham, Spam, Spam];
        let report = ClassificationReport::from_labels(&predicted, &actual).unwrap();
        assert!((report.spam.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.spam.recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.ham.precision - 0.5).abs() < 1e-12);
        assert!((report.ham.recall - 0.5).abs() < 1e-12);
        assert!((report.accuracy - 0.6).abs() < 1e-12);
        assert_eq!(report.ham.support, 2);
        assert_eq!(report.macro_avg.support, 5);

        let text = report.to_string();
        assert!(text.contains("precision"));
        assert!(text.contains("spam"));
        assert!(text.contains("weighted avg"));
    }

    #[test]
    fn class_never_predicted_has_zero_precision() {
        let report = ClassificationReport::from_labels(&[Ham, Ham], &[Ham, Spam]).unwrap();
        assert_eq!(report.spam.precision, 0.0);
        assert_eq!(report.spam.f1, 0.0);
        assert_eq!(report.ham.recall, 1.0);
    }
}
