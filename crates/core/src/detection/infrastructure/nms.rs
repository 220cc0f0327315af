/// A raw detector output box with corner coordinates and a score.
///
/// Coordinates may be in any consistent space (relative fractions or
/// absolute pixels); NMS only compares boxes against each other.
#[derive(Clone, Copy, Debug)]
pub struct ScoredBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub score: f64,
}

impl ScoredBox {
    fn area(&self) -> f64 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    fn iou(&self, other: &ScoredBox) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

/// Greedy non-maximum suppression: highest score wins, overlapping boxes
/// above `iou_thresh` are discarded.
pub fn suppress(mut boxes: Vec<ScoredBox>, iou_thresh: f64) -> Vec<ScoredBox> {
    boxes.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<ScoredBox> = Vec::with_capacity(boxes.len());
    for b in boxes {
        if kept.iter().all(|k| k.iou(&b) <= iou_thresh) {
            kept.push(b);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(x1: f64, y1: f64, x2: f64, y2: f64, score: f64) -> ScoredBox {
        ScoredBox {
            x1,
            y1,
            x2,
            y2,
            score,
        }
    }

    #[test]
    fn test_suppresses_overlapping_lower_score() {
        let kept = suppress(
            vec![
                boxed(0.0, 0.0, 100.0, 100.0, 0.9),
                boxed(5.0, 5.0, 105.0, 105.0, 0.7),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 1);
        assert!((kept[0].score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_keeps_disjoint_boxes() {
        let kept = suppress(
            vec![
                boxed(0.0, 0.0, 50.0, 50.0, 0.9),
                boxed(200.0, 200.0, 250.0, 250.0, 0.8),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_highest_score_kept_regardless_of_order() {
        let kept = suppress(
            vec![
                boxed(5.0, 5.0, 105.0, 105.0, 0.7),
                boxed(0.0, 0.0, 100.0, 100.0, 0.9),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 1);
        assert!((kept[0].score - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(suppress(Vec::new(), 0.3).is_empty());
    }

    #[test]
    fn test_works_in_relative_space() {
        let kept = suppress(
            vec![
                boxed(0.1, 0.1, 0.5, 0.5, 0.95),
                boxed(0.12, 0.12, 0.52, 0.52, 0.6),
            ],
            0.3,
        );
        assert_eq!(kept.len(), 1);
    }
}
