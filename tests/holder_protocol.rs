// tests/holder_protocol.rs
use glam::Vec3;
use proptest::prelude::*;
use warehouse_sim::{Grabber, Hold, Holder, HolderError};

#[derive(Debug, PartialEq)]
struct Parcel(u32);

fn holder_at(x: f32) -> Holder<Parcel> {
    Holder::new(Vec3::new(x, 0.0, 0.0))
}

fn filled_at(x: f32, id: u32) -> Holder<Parcel> {
    let mut holder = holder_at(x);
    holder.receive(Parcel(id)).expect("empty holder");
    holder
}

#[test]
fn test_receive_then_give_returns_the_same_object() {
    let mut holder = holder_at(0.0);
    assert!(!holder.has_object());

    holder.receive(Parcel(7)).expect("empty holder");
    assert!(holder.has_object());
    assert_eq!(holder.object(), Some(&Parcel(7)));

    assert_eq!(holder.give(), Ok(Parcel(7)));
    assert!(!holder.has_object());
}

#[test]
fn test_receive_into_occupied_holder_hands_object_back() {
    let mut holder = filled_at(0.0, 1);
    let rejected = holder.receive(Parcel(2)).unwrap_err();
    assert_eq!(rejected.error, HolderError::AlreadyHolding);
    assert_eq!(rejected.into_inner(), Parcel(2));
    assert_eq!(holder.object(), Some(&Parcel(1)));
}

#[test]
fn test_give_from_empty_holder_fails() {
    let mut holder = holder_at(0.0);
    assert_eq!(holder.give(), Err(HolderError::Empty));
}

#[test]
fn test_locked_holder_refuses_both_directions() {
    let mut holder = filled_at(0.0, 1);
    holder.set_lock(true);
    assert!(holder.get_lock());
    assert_eq!(holder.give(), Err(HolderError::Locked));
    assert!(holder.has_object());

    let mut empty = holder_at(0.0);
    empty.set_lock(true);
    let rejected = empty.receive(Parcel(3)).unwrap_err();
    assert_eq!(HolderError::from(rejected), HolderError::Locked);
    assert!(!empty.has_object());

    holder.set_lock(false);
    assert_eq!(holder.give(), Ok(Parcel(1)));
}

#[test]
fn test_lock_takes_precedence_over_occupancy() {
    let mut full = filled_at(0.0, 1);
    full.set_lock(true);
    let rejected = full.receive(Parcel(2)).unwrap_err();
    assert_eq!(rejected.error, HolderError::Locked);
    assert_eq!(rejected.into_inner(), Parcel(2));
    assert_eq!(full.object(), Some(&Parcel(1)));

    let mut empty = holder_at(0.0);
    empty.set_lock(true);
    assert_eq!(empty.give(), Err(HolderError::Locked));
    assert!(!empty.has_object());
}

#[test]
fn test_replace_with_releases_the_previous_object_first() {
    let mut holder = filled_at(0.0, 1);
    holder.set_lock(true);

    let mut released = Vec::new();
    holder.replace_with(Parcel(2), |old| released.push(old));
    assert_eq!(released, vec![Parcel(1)]);
    assert_eq!(holder.object(), Some(&Parcel(2)));
    assert!(holder.get_lock(), "replacing keeps the lock");
}

#[test]
fn test_grabber_picks_from_the_closest_holder_in_range() {
    let mut grabber = Grabber::new(12.0);
    let mut holders = vec![filled_at(5.0, 5), filled_at(10.0, 10), filled_at(15.0, 15)];

    assert!(grabber.interact_closest(holders.iter_mut()));
    assert_eq!(grabber.holder().object(), Some(&Parcel(5)));
    assert!(!holders[0].has_object());
    assert!(holders[1].has_object());
    assert!(holders[2].has_object());
}

#[test]
fn test_grabber_drops_onto_the_closest_holder() {
    let mut grabber = Grabber::new(12.0);
    grabber.receive(Parcel(99)).expect("empty grabber");
    let mut holders = vec![holder_at(10.0), holder_at(5.0)];

    assert!(grabber.interact_closest(holders.iter_mut()));
    assert!(!grabber.has_object());
    assert_eq!(holders[1].object(), Some(&Parcel(99)));
    assert!(!holders[0].has_object());
}

#[test]
fn test_grabber_ignores_holders_out_of_range() {
    let mut grabber = Grabber::new(12.0);
    let mut holders = vec![filled_at(12.0, 1), filled_at(-30.0, 2)];

    assert!(!grabber.interact_closest(holders.iter_mut()));
    assert!(!grabber.has_object());
    assert!(holders.iter().all(|h| h.has_object()));
}

#[test]
fn test_grabber_skips_locked_holders() {
    let mut grabber = Grabber::new(20.0);
    let mut near = filled_at(2.0, 1);
    near.set_lock(true);
    let mut far = filled_at(8.0, 2);

    assert!(grabber.interact_closest([&mut near, &mut far]));
    assert_eq!(grabber.holder().object(), Some(&Parcel(2)));
    assert!(near.has_object());
}

#[test]
fn test_grabber_tie_goes_to_the_first_holder() {
    let mut grabber = Grabber::new(20.0);
    let mut holders = vec![filled_at(-4.0, 1), filled_at(4.0, 2)];

    assert!(grabber.interact_closest(holders.iter_mut()));
    assert_eq!(grabber.holder().object(), Some(&Parcel(1)));
}

#[test]
fn test_refused_drop_keeps_the_object_on_the_grabber() {
    let mut grabber = Grabber::new(20.0);
    grabber.receive(Parcel(1)).expect("empty grabber");
    let mut occupied = filled_at(3.0, 2);

    assert!(!grabber.interact_closest([&mut occupied]));
    assert_eq!(grabber.holder().object(), Some(&Parcel(1)));
    assert_eq!(occupied.object(), Some(&Parcel(2)));
}

#[test]
fn test_empty_handed_grabber_on_empty_holder_does_nothing() {
    let mut grabber: Grabber<Parcel> = Grabber::new(20.0);
    let mut empty = holder_at(1.0);
    assert!(!grabber.interact_closest([&mut empty]));
    assert!(!grabber.has_object());
    assert!(!empty.has_object());
}

#[test]
fn test_locked_grabber_never_interacts() {
    let mut grabber = Grabber::new(20.0);
    grabber.set_lock(true);
    let mut holder = filled_at(1.0, 1);

    assert!(!grabber.interact_closest([&mut holder]));
    assert!(holder.has_object());
}

#[test]
fn test_grabber_measures_from_its_world_position() {
    let mut grabber = Grabber::new(5.0);
    let mut holder = filled_at(100.0, 1);
    assert!(!grabber.interact_closest([&mut holder]));

    grabber.set_world_position(Vec3::new(97.0, 0.0, 0.0));
    assert_eq!(grabber.world_position(), Vec3::new(97.0, 0.0, 0.0));
    assert!(grabber.interact_closest([&mut holder]));
}

proptest! {
    #[test]
    fn prop_protocol_never_loses_the_object(
        start_full in any::<bool>(),
        locked in any::<bool>(),
        receive_first in any::<bool>(),
    ) {
        let mut holder = if start_full { filled_at(0.0, 1) } else { holder_at(0.0) };
        holder.set_lock(locked);

        let mut outside = receive_first.then_some(Parcel(2));
        if receive_first {
            if let Some(parcel) = outside.take() {
                match holder.receive(parcel) {
                    Ok(()) => prop_assert!(!start_full && !locked),
                    Err(rejected) => {
                        let expected = if locked {
                            HolderError::Locked
                        } else {
                            HolderError::AlreadyHolding
                        };
                        prop_assert_eq!(rejected.error, expected);
                        outside = Some(rejected.into_inner());
                    }
                }
            }
        } else {
            match holder.give() {
                Ok(parcel) => {
                    prop_assert!(start_full && !locked);
                    prop_assert_eq!(&parcel, &Parcel(1));
                }
                Err(error) => {
                    let expected = if locked { HolderError::Locked } else { HolderError::Empty };
                    prop_assert_eq!(error, expected);
                }
            }
        }

        // Every parcel that existed is still somewhere.
        let inside = usize::from(holder.has_object());
        let total = inside + usize::from(outside.is_some());
        let expected_total = usize::from(start_full) + usize::from(receive_first);
        let given_away = usize::from(!receive_first && start_full && !locked);
        prop_assert_eq!(total + given_away, expected_total);
    }
}
