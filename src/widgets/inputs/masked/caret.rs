use super::model::CompiledMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretMove {
    /// Caret before the edit.
    pub from: usize,
    /// Length of the field text before the edit.
    pub field_len: usize,
    pub caret: usize,
    pub anchor: usize,
}

/// Moves the caret off fixed literal positions, in the direction it was travelling.
///
/// A forward move skips literals rightwards until a variable slot or the end of the
/// field. A backward move steps left over literals, stopping at index 0 even when that
/// position is itself a literal. The anchor follows the caret unless a selection is open.
pub fn correct(mask: &CompiledMask, mv: CaretMove) -> (usize, usize) {
    let CaretMove {
        from,
        field_len,
        mut caret,
        mut anchor,
    } = mv;

    if caret > from {
        while caret < field_len && mask.is_fixed_at(caret) {
            if anchor == caret {
                anchor += 1;
            }
            caret += 1;
        }
    } else if caret < from && caret <= anchor {
        let collapsed = anchor == caret;
        while caret > 0 && mask.is_fixed_at(caret) {
            caret -= 1;
            if collapsed {
                anchor = caret;
            }
        }
    }

    if (caret, anchor) != (mv.caret, mv.anchor) {
        tracing::trace!(
            from = mv.caret,
            to = caret,
            anchor,
            "caret moved off literal"
        );
    }
    (caret, anchor)
}

#[cfg(test)]
mod tests {
    use super::{CaretMove, correct};
    use crate::widgets::inputs::masked::parser::compile;

    fn mv(from: usize, caret: usize, anchor: usize) -> CaretMove {
        CaretMove {
            from,
            field_len: 7,
            caret,
            anchor,
        }
    }

    #[test]
    fn forward_move_skips_literal() {
        let mask = compile("###-###", '_').expect("mask");
        assert_eq!(correct(&mask, mv(2, 3, 3)), (4, 4));
        assert_eq!(correct(&mask, mv(0, 1, 1)), (1, 1));
    }

    #[test]
    fn forward_move_with_selection_keeps_anchor() {
        let mask = compile("###-###", '_').expect("mask");
        assert_eq!(correct(&mask, mv(2, 3, 1)), (4, 1));
    }

    #[test]
    fn backward_move_steps_over_literal() {
        let mask = compile("###-###", '_').expect("mask");
        assert_eq!(correct(&mask, mv(4, 3, 3)), (2, 2));
        assert_eq!(correct(&mask, mv(6, 5, 5)), (5, 5));
    }

    #[test]
    fn backward_move_with_selection_keeps_anchor() {
        let mask = compile("###-###", '_').expect("mask");
        assert_eq!(correct(&mask, mv(4, 3, 6)), (2, 6));
    }

    #[test]
    fn consecutive_literals_are_all_skipped() {
        let mask = compile("(##) ##", '_').expect("mask");
        assert_eq!(correct(&mask, mv(2, 3, 3)), (5, 5));
        assert_eq!(correct(&mask, mv(5, 4, 4)), (2, 2));
        assert_eq!(correct(&mask, mv(1, 0, 0)), (0, 0));
    }

    #[test]
    fn forward_move_stops_at_end_of_field() {
        let mask = compile("##-", '_').expect("mask");
        let moved = CaretMove {
            from: 1,
            field_len: 3,
            caret: 2,
            anchor: 2,
        };
        assert_eq!(correct(&mask, moved), (3, 3));
    }

    #[test]
    fn all_literal_mask_stops_at_zero() {
        let mask = compile("--", ' ').expect("mask");
        let moved = CaretMove {
            from: 2,
            field_len: 2,
            caret: 1,
            anchor: 1,
        };
        assert_eq!(correct(&mask, moved), (0, 0));
    }

    #[test]
    fn correction_is_idempotent() {
        let mask = compile("###.###.###-##", '_').expect("mask");
        for from in 0..=14 {
            for caret in 0..=14 {
                let first = correct(
                    &mask,
                    CaretMove {
                        from,
                        field_len: 14,
                        caret,
                        anchor: caret,
                    },
                );
                let second = correct(
                    &mask,
                    CaretMove {
                        from,
                        field_len: 14,
                        caret: first.0,
                        anchor: first.1,
                    },
                );
                assert_eq!(first, second, "from {from} caret {caret}");
            }
        }
    }
}
