//! End-to-end tests over the `lute` facade: layers in a tree, modes and
//! operators applied to the outputs.

use lute::prelude::*;
use rstest::rstest;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Model -> (encoder -> (fc1, fc2), head)
fn model(init_range: f64) -> Module {
    let mut encoder = Module::labelled("Encoder");
    encoder
        .set_child("fc1", Linear::new(2, 3).init_range(init_range).build().unwrap().into_module())
        .unwrap();
    encoder
        .set_child("fc2", Linear::new(3, 3).init_range(init_range).build().unwrap().into_module())
        .unwrap();

    let mut model = Module::labelled("Model");
    model.set_child("encoder", encoder).unwrap();
    model
        .set_child(
            "head",
            Linear::new(3, 1)
                .bias(false)
                .init_range(init_range)
                .build()
                .unwrap()
                .into_module(),
        )
        .unwrap();
    model
}

#[test]
fn test_layer_parameters_are_qualified_by_path() {
    init_logger();
    let m = model(0.5);
    let named = m.named_parameters();

    // (2*3 + 3) + (3*3 + 3) + 3*1
    assert_eq!(named.len(), 24);
    assert_eq!(m.num_parameters(), 24);
    assert_eq!(named[0].0, "encoder.fc1.weight_0_0");
    assert_eq!(named.last().unwrap().0, "head.weight_2_0");
    assert!(named.iter().all(|(_, p)| (-0.5..0.5).contains(p.value())));
}

#[test]
fn test_eval_reaches_every_layer() {
    init_logger();
    let mut m = model(0.0);
    m.eval();

    let mut visited = 0;
    m.walk(|_, node| {
        assert!(!node.is_training());
        visited += 1;
    });
    assert_eq!(visited, 5);

    m.get_submodule_mut("encoder").unwrap().train();
    assert!(!m.is_training());
    assert!(m.get_submodule("encoder.fc2").unwrap().is_training());
    assert!(!m.get_submodule("head").unwrap().is_training());
}

#[test]
fn test_repr_lists_the_tree() {
    let m = model(0.0);
    let text = m.to_string();
    assert!(text.starts_with("Model(\n"));
    assert!(text.contains("(encoder): Encoder(\n"));
    assert!(text.contains("    (fc1): Linear()"));
    assert!(text.ends_with(')'));
}

#[rstest]
#[case(&[1.0, 1.0], 0.5)]
#[case(&[-1.0, 2.0], 0.5)]
fn test_zero_initialized_pipeline_outputs_sigmoid_of_zero(
    #[case] x: &[f64],
    #[case] expected: f64,
) {
    let m = model(0.0);
    let mut h = x.to_vec();
    for path in ["encoder.fc1", "encoder.fc2", "head"] {
        h = linear(m.get_submodule(path).unwrap(), &h).unwrap();
        h = map(relu)(&h);
    }
    assert_eq!(map(sigmoid)(&h), vec![expected]);
}

#[test]
fn test_updated_parameters_drive_the_output() {
    let mut m = model(0.0);
    for p in m.parameters_mut() {
        p.update(1.0);
    }
    // fc1: 1+1+1 = 3 per unit, fc2: 3*3+1 = 10 per unit, head: 3*10 = 30
    let h = linear(m.get_submodule("encoder.fc1").unwrap(), &[1.0, 1.0]).unwrap();
    let h = linear(m.get_submodule("encoder.fc2").unwrap(), &h).unwrap();
    let y = linear(m.get_submodule("head").unwrap(), &h).unwrap();
    assert_eq!(y, vec![30.0]);
    assert_eq!(sum(&h), 30.0);
}
