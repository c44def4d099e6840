//! Object types shared by the tests of this crate.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use crate::object::{BaseObject, Object};
use crate::registry::TypeRegistry;
use crate::schema::Schema;

// -----------------------------------------------------------------------------
// Person

#[derive(Default, Debug, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

crate::impl_type_path!(Person => "test::Person");

impl Object for Person {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("name", |p: &Person| &p.name, |p| &mut p.name)
            .field("age", |p: &Person| &p.age, |p| &mut p.age)
    }
}

impl Person {
    pub fn jack() -> Self {
        Self {
            name: String::from("jack"),
            age: 23,
        }
    }
}

// -----------------------------------------------------------------------------
// Animals

pub trait Animal: BaseObject {
    fn name(&self) -> &str;
    fn sound(&self) -> String;
}

#[derive(Default, Debug, PartialEq)]
pub struct Creature {
    pub name: String,
    pub legs: u8,
}

crate::impl_type_path!(Creature => "test::Creature");

impl Object for Creature {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("name", |c: &Creature| &c.name, |c| &mut c.name)
            .field("legs", |c: &Creature| &c.legs, |c| &mut c.legs)
    }
}

#[derive(Default, Debug)]
pub struct Dog {
    pub creature: Creature,
    pub breed: String,
    pub good: bool,
    pub friend: Option<Box<dyn BaseObject>>,
}

crate::impl_type_path!(Dog => "test::Dog");

impl Object for Dog {
    fn schema() -> Schema<Self> {
        Schema::new()
            .base(|d: &Dog| &d.creature, |d| &mut d.creature)
            .field("breed", |d: &Dog| &d.breed, |d| &mut d.breed)
            .field("good", |d: &Dog| &d.good, |d| &mut d.good)
            .polymorphic("friend", |d: &Dog| &d.friend, |d| &mut d.friend)
    }
}

impl Animal for Dog {
    fn name(&self) -> &str {
        &self.creature.name
    }

    fn sound(&self) -> String {
        format!("{} says woof", self.creature.name)
    }
}

impl Dog {
    pub fn rex() -> Self {
        Self {
            creature: Creature {
                name: String::from("rex"),
                legs: 4,
            },
            breed: String::from("collie"),
            good: true,
            friend: None,
        }
    }
}

#[derive(Default, Debug, PartialEq)]
pub struct Cat {
    pub creature: Creature,
    pub lives: u8,
}

crate::impl_type_path!(Cat => "test::Cat");

impl Object for Cat {
    const VERSION: u32 = 2;

    fn schema() -> Schema<Self> {
        Schema::new()
            .base(|c: &Cat| &c.creature, |c| &mut c.creature)
            .field("lives", |c: &Cat| &c.lives, |c| &mut c.lives)
    }
}

impl Animal for Cat {
    fn name(&self) -> &str {
        &self.creature.name
    }

    fn sound(&self) -> String {
        format!("{} says meow", self.creature.name)
    }
}

impl Cat {
    pub fn tom() -> Self {
        Self {
            creature: Creature {
                name: String::from("tom"),
                legs: 4,
            },
            lives: 9,
        }
    }
}

// -----------------------------------------------------------------------------
// Owner

#[derive(Default, Debug, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: u16,
}

crate::impl_type_path!(Address => "test::Address");

impl Object for Address {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("street", |a: &Address| &a.street, |a| &mut a.street)
            .field("number", |a: &Address| &a.number, |a| &mut a.number)
    }
}

#[derive(Default, Debug)]
pub struct Owner {
    pub name: String,
    pub address: Address,
    pub pet: Option<Box<dyn BaseObject>>,
}

crate::impl_type_path!(Owner => "test::Owner");

impl Object for Owner {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("name", |o: &Owner| &o.name, |o| &mut o.name)
            .nested("address", |o: &Owner| &o.address, |o| &mut o.address)
            .polymorphic("pet", |o: &Owner| &o.pet, |o| &mut o.pet)
    }
}

// -----------------------------------------------------------------------------
// Node

/// A singly linked chain, one object level per node.
#[derive(Default, Debug)]
pub struct Node {
    pub value: i64,
    pub next: Option<Box<dyn BaseObject>>,
}

crate::impl_type_path!(Node => "test::Node");

impl Object for Node {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("value", |n: &Node| &n.value, |n| &mut n.value)
            .polymorphic("next", |n: &Node| &n.next, |n| &mut n.next)
    }
}

impl Node {
    pub fn chain(len: i64) -> Self {
        let mut head = Node {
            value: len,
            next: None,
        };
        for value in (1..len).rev() {
            head = Node {
                value,
                next: Some(Box::new(head)),
            };
        }
        head
    }
}

// -----------------------------------------------------------------------------
// Sample

/// One field of every primitive kind.
#[derive(Default, Debug, PartialEq)]
pub struct Sample {
    pub flag: bool,
    pub small: u8,
    pub short: u16,
    pub word: u32,
    pub big: u64,
    pub tiny: i8,
    pub signed_short: i16,
    pub signed_word: i32,
    pub signed_big: i64,
    pub ratio: f32,
    pub precise: f64,
    pub letter: char,
    pub text: String,
}

crate::impl_type_path!(Sample => "test::Sample");

impl Object for Sample {
    fn schema() -> Schema<Self> {
        Schema::new()
            .field("flag", |s: &Sample| &s.flag, |s| &mut s.flag)
            .field("small", |s: &Sample| &s.small, |s| &mut s.small)
            .field("short", |s: &Sample| &s.short, |s| &mut s.short)
            .field("word", |s: &Sample| &s.word, |s| &mut s.word)
            .field("big", |s: &Sample| &s.big, |s| &mut s.big)
            .field("tiny", |s: &Sample| &s.tiny, |s| &mut s.tiny)
            .field("signed_short", |s: &Sample| &s.signed_short, |s| &mut s.signed_short)
            .field("signed_word", |s: &Sample| &s.signed_word, |s| &mut s.signed_word)
            .field("signed_big", |s: &Sample| &s.signed_big, |s| &mut s.signed_big)
            .field("ratio", |s: &Sample| &s.ratio, |s| &mut s.ratio)
            .field("precise", |s: &Sample| &s.precise, |s| &mut s.precise)
            .field("letter", |s: &Sample| &s.letter, |s| &mut s.letter)
            .field("text", |s: &Sample| &s.text, |s| &mut s.text)
    }
}

// -----------------------------------------------------------------------------
// Ghost

/// Never registered by [`registry`].
#[derive(Default, Debug)]
pub struct Ghost {
    pub haunts: u32,
}

crate::impl_type_path!(Ghost => "test::Ghost");

impl Object for Ghost {
    fn schema() -> Schema<Self> {
        Schema::new().field("haunts", |g: &Ghost| &g.haunts, |g| &mut g.haunts)
    }
}

// -----------------------------------------------------------------------------
// Registry

pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register::<Person>().unwrap();
    registry.register::<Dog>().unwrap();
    registry.register::<Cat>().unwrap();
    registry.register::<Owner>().unwrap();
    registry.register::<Node>().unwrap();
    registry.register::<Sample>().unwrap();
    registry
        .register_upcast::<Dog, dyn Animal>(|dog| dog as Box<dyn Animal>)
        .unwrap();
    registry
        .register_upcast::<Cat, dyn Animal>(|cat| cat as Box<dyn Animal>)
        .unwrap();
    registry
}
