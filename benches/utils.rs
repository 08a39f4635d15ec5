use criterion::Criterion;

pub fn make_criterion() -> Criterion {
    Criterion::default().configure_from_args()
}
