use criterion::{criterion_group, criterion_main, Criterion};
use tta_domain::*;

fn bench_guard_eval() {
    // Create 100 variables and 200 guards, then evaluate them repeatedly
    // against the same environment.
    let mut internal = SymbolTable::new();
    let external = SymbolTable::new();
    let mut guards = vec![];
    for i in 1..100 {
        let ident = format!("var_{i}");
        internal.insert(ident.clone(), false.to_value());

        let g1 = Expression::guard(&format!("!{ident}")).unwrap();
        let g2 = Expression::guard(&format!("{ident} == false")).unwrap();
        guards.push(g1);
        guards.push(g2);
    }

    let env = Environments::new(&internal, &external);
    for _ in 0..10_000 {
        for g in &guards {
            let _ = g.eval_bool(&env);
        }
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("guard_eval", |b| b.iter(bench_guard_eval));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
