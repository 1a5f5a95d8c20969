// Take in a slice of bytes and return a hex view of it.

pub fn hex_view(bytes: &[u8]) -> String {
    let mut offset = 0;
    let mut screen_string = String::new();

    // push the header
    screen_string.push_str(" Offset(h)  00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F\n");

    while offset < bytes.len() {
        // first goes the offset, padded so its 10 characters long
        let mut line = format!("{offset:0>10X}  ");
        // now for all the numbers
        for i in 0..16 {
            if offset + i >= bytes.len() {
                line.push_str("  ");
            } else {
                line.push_str(&format!("{:02X} ", bytes[offset + i]));
            }
        }

        // now for the text version
        line.push(' ');
        for i in 0..16 {
            let mut character = if offset + i >= bytes.len() {
                ' '
            } else {
                char::from(bytes[offset + i])
            };
            if !character.is_ascii() || character.is_ascii_control() {
                character = '.';
            }
            line.push(character);
        }

        screen_string.push_str(&line);
        screen_string.push('\n');

        offset += 16;
    }

    screen_string
}
