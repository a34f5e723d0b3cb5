/*!

This is the long-form manual for `bubble_tally` and `globos`.

## Data file

All the people are kept in a single CSV file (`progreso.csv` by default). The
first row is a fixed header with four columns, in this order:

```text
Persona,Categoria,Votos,Imagen
Ana,Categoria 1,3,
Luis,Categoria 2,5,https://example.com/luis.png
Marta,Categoria 2,0,data:image/png;base64,iVBORw0KGgo...
```

- `Persona`: the name. It does not need to be unique.
- `Categoria`: one of the configured categories.
- `Votos`: a non-negative integer. `5.0` is read as `5`.
- `Imagen`: optional. Either a URL or an inline `data:` image. Neither is checked.

A missing file is the same as an empty board. A file that exists but does not
follow this layout is an error: it is never replaced by an empty board.

The file is rewritten in full after every change. There is no locking: two
users changing the board at the same time will lose one of the two changes.

## Updating votes

People are found by name, and optionally by category. When several people
share a name and no category is given, the `duplicateNameMode` option decides:
- `updateAll` (default): all of them receive the new count.
- `requireUnique`: the update is rejected and nothing changes.

## Layouts

### `scatter`

Every bubble is placed at random with a fixed seed (42 by default). The same
number of bubbles always gives the same picture, but adding one bubble moves
all the others. This is a known limitation of this layout.

The positions come from the standard generator of the `rand` crate, whose
output may change between releases of `rand`. A seed reproduces a picture
for a given build of `globos`, not across upgrades of that dependency.

Sizes are proportional to the votes. Category bubbles reach 100 and person
bubbles reach 60.

### `radial`

The people of one category are placed around the center `(0.5, 0.5)`, one per
equal sector of the circle, in the order of the data file. Sizes go linearly
from `minSize` (no votes) to `maxSize` (most votes). The ring radius is
`0.1 + 0.3 * n / 10` for `n` people, plus `size / 300` for each bubble.

## Images

An uploaded picture is cropped to a square from its top-left corner, masked
with a circle so that the corners are transparent, and stored inline as a PNG
`data:` URL. If the upload cannot be decoded, the image URL is used instead,
or no image at all.

## Configuration

`globos` runs with sensible defaults. A JSON configuration file can be passed
with `--config`:

```text
{
  "dataFile": "progreso.csv",
  "categories": [
    { "name": "Kindness", "color": "#E74C3C" },
    { "name": "Courage", "color": "#3498DB" }
  ],
  "layout": { "seed": 42, "categoryMaxSize": 100, "personMaxSize": 60, "minSize": 30, "maxSize": 90 },
  "duplicateNameMode": "updateAll"
}
```

All the fields are optional. Categories without a color use the default palette.
A relative `dataFile` is resolved from the directory of the configuration file.

 */
