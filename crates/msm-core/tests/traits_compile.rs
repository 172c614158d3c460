use msm_core::{OperatorEntry, TransitionOperator};
use nalgebra::{DMatrix, DVector};

/// Two-state chain that always swaps states.
#[derive(Debug, Default)]
struct Flip;

impl TransitionOperator for Flip {
    fn num_states(&self) -> usize {
        2
    }

    fn propagate_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        for col in 0..src.ncols() {
            dst[(0, col)] = src[(1, col)];
            dst[(1, col)] = src[(0, col)];
        }
    }

    fn propagate_transpose_into(&self, src: &DMatrix<f64>, dst: &mut DMatrix<f64>) {
        self.propagate_into(src, dst);
    }

    fn entries(&self) -> Vec<OperatorEntry> {
        vec![
            OperatorEntry {
                row: 0,
                col: 1,
                weight: 1.0,
            },
            OperatorEntry {
                row: 1,
                col: 0,
                weight: 1.0,
            },
        ]
    }
}

#[test]
fn default_methods_follow_entries() {
    let op: Box<dyn TransitionOperator> = Box::new(Flip);
    assert_eq!(op.row_sums(), DVector::from_vec(vec![1.0, 1.0]));
    assert_eq!(
        op.to_dense(),
        DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0])
    );
    let block = DMatrix::from_column_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let moved = op.propagate(&block);
    assert_eq!(moved, DMatrix::from_column_slice(2, 2, &[2.0, 1.0, 4.0, 3.0]));
}
