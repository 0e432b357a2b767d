use super::support::*;
use super::*;

#[test]
fn gathering_empties_the_cell_and_pays_metabolism() {
    let mut sim = frozen_sim(3, 3);
    configure_sim(&mut sim, vec![make_agent(0, 1, 1, 5, 2, 1)]);
    set_cell(&mut sim, 1, 1, 3, Fertility::Full);

    let harvested = sim.gather_and_eat(0);

    assert_eq!(harvested, 3);
    assert_eq!(sim.field.level(1, 1), 0);
    assert_eq!(agent(&sim, 0).holdings, 6);
}

#[test]
fn gathering_an_empty_cell_still_costs_metabolism() {
    let mut sim = frozen_sim(2, 2);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 2, 3, 1)]);

    assert_eq!(sim.gather_and_eat(0), 0);
    assert_eq!(agent(&sim, 0).holdings, -1);
    assert!(sim.see_if_die(0));
}

#[test]
fn surplus_is_planted_up_to_capacity() {
    let mut sim = frozen_sim(3, 3);
    configure_sim(&mut sim, vec![make_agent(0, 1, 1, 10, 3, 1)]);
    set_cell(&mut sim, 1, 1, 1, Fertility::Full);

    let planted = sim.plant_sugar(0);

    assert_eq!(planted, 3);
    let cell = sim.field.cell(1, 1).expect("cell");
    assert_eq!(cell.resource_level, CAPACITY);
    assert!(cell.planted_this_round);
    assert_eq!(agent(&sim, 0).holdings, 7);
}

#[test]
fn planting_is_bounded_by_surplus() {
    let mut sim = frozen_sim(2, 2);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 4, 2, 1)]);

    assert_eq!(sim.plant_sugar(0), 2);
    assert_eq!(sim.field.level(0, 0), 2);
    assert_eq!(agent(&sim, 0).holdings, 2);
}

#[test]
fn no_surplus_means_no_planting() {
    for holdings in [1, 2] {
        let mut sim = frozen_sim(2, 2);
        configure_sim(&mut sim, vec![make_agent(0, 0, 0, holdings, 2, 1)]);
        set_cell(&mut sim, 0, 0, 1, Fertility::Full);
        let before = sim.field.clone();

        assert_eq!(sim.plant_sugar(0), 0, "holdings {holdings}");

        assert_eq!(sim.field, before);
        assert_eq!(agent(&sim, 0).holdings, holdings);
    }
}

#[test]
fn low_fertility_caps_planting_at_one_unit() {
    let mut sim = frozen_sim(2, 2);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 20, 1, 1)]);
    set_cell(&mut sim, 0, 0, 0, Fertility::Low);

    assert_eq!(sim.plant_sugar(0), 1);
    assert_eq!(sim.field.level(0, 0), 1);
    assert_eq!(agent(&sim, 0).holdings, 19);
}

#[test]
fn barren_cells_cannot_be_planted() {
    let mut sim = frozen_sim(2, 2);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 20, 1, 1)]);
    set_cell(&mut sim, 0, 0, 0, Fertility::Barren);

    assert_eq!(sim.plant_sugar(0), 0);
    assert_eq!(
        *sim.field.cell(0, 0).expect("cell"),
        CellState {
            resource_level: 0,
            fertility: Fertility::Barren,
            planted_this_round: false,
        }
    );
    assert_eq!(agent(&sim, 0).holdings, 20);
}

#[test]
fn full_cells_have_no_headroom() {
    let mut sim = frozen_sim(2, 2);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 20, 1, 1)]);
    set_cell(&mut sim, 0, 0, CAPACITY, Fertility::Full);

    assert_eq!(sim.plant_sugar(0), 0);
    assert!(!sim.field.cell(0, 0).expect("cell").planted_this_round);
}

#[test]
fn planting_in_a_round_shows_up_in_metrics_and_next_regrowth() {
    let mut config = test_config(1, 1, 0);
    config.regrowth_policy = RegrowthPolicy::PlantedOnly;
    let mut sim = empty_sim_with(config);
    configure_sim(&mut sim, vec![make_agent(0, 0, 0, 10, 1, 1)]);
    set_cell(&mut sim, 0, 0, 2, Fertility::Full);

    // Gather 2 -> holdings 11, plant min(10, 4, 4) = 4.
    let first = sim.step();
    assert_eq!(first.planted_cells, 1);
    assert_eq!(sim.field.level(0, 0), CAPACITY);
    assert_eq!(agent(&sim, 0).holdings, 7);

    // Regrowth pushes the planted full cell over capacity before the agent gathers.
    let second = sim.step();
    assert_eq!(second.overused_cells, 1);
    assert_eq!(agent(&sim, 0).holdings, 6 - 4);
}
