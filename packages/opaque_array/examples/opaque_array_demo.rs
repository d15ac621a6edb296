//! Demonstrates `OpaqueArray` with a small struct element type and automatic growth.
//!
//! Starting from a capacity of 5, the same value is written to the first 50 indexes. The
//! default doubling policy grows the array 5 -> 10 -> 20 -> 40 -> 80 along the way. Finally, a
//! read past the capacity shows that reads never grow the array.

use std::error::Error;
use std::io;

use opaque_array::{ArrayFlags, OpaqueArray, Zeroable};

#[derive(Clone, Copy, Debug)]
struct Pair {
    x: i32,
    y: i32,
}

// SAFETY: Pair only contains integers, for which zero is a valid value.
unsafe impl Zeroable for Pair {}

fn main() -> Result<(), Box<dyn Error>> {
    let mut array = OpaqueArray::builder()
        .element_of::<Pair>()
        .capacity(5)
        .flags(ArrayFlags::AUTO_GROW)
        .build()?;

    println!("Created: {}", array.status());

    let value = Pair { x: 3, y: 4 };

    for index in 0..50 {
        let capacity_before = array.capacity();

        // SAFETY: The array was built for Pair elements.
        unsafe { array.set_value(index, &value) }?;

        if array.capacity() != capacity_before {
            println!(
                "Write to index {index} grew the capacity from {capacity_before} to {}",
                array.capacity()
            );
        }
    }

    println!("After 50 writes: {}", array.status());

    // SAFETY: The array was built for Pair elements.
    let first: Pair = unsafe { array.get_value(0) }?;
    println!("Element 0: {first:?}");

    // SAFETY: The array was built for Pair elements.
    match unsafe { array.get_value::<Pair>(80) } {
        Ok(pair) => println!("Element 80 unexpectedly readable: {pair:?}"),
        Err(error) => println!("Element 80: {error}"),
    }

    array.status().write_to(&mut io::stdout())?;

    array.destroy()?;

    Ok(())
}
